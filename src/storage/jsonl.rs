//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one entity. Players and
//! matches live in separate files under the data directory.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use super::{Repository, StorageConfig, StorageError};
use crate::models::{Match, Player, PlayerId};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Match,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all entities from the file. A missing file reads as empty.
    ///
    /// A line that does not parse fails the whole read with
    /// [`StorageError::Malformed`].
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    return Err(StorageError::Malformed {
                        path: self.path.clone(),
                        line: idx + 1,
                        source: e,
                    });
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Next id to hand out, persisted across resets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PlayerSequence {
    next_id: PlayerId,
}

/// Repository backed by JSONL files under a data directory.
///
/// Files are opened and closed inside each operation.
#[derive(Debug, Clone)]
pub struct JsonlRepository {
    config: StorageConfig,
}

impl JsonlRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn players(&self) -> JsonlReader<Player> {
        JsonlReader::new(self.config.players_path())
    }

    fn matches(&self) -> JsonlReader<Match> {
        JsonlReader::new(self.config.matches_path())
    }

    /// Claim the next player id, advancing the persisted sequence.
    fn claim_player_id(&self) -> Result<PlayerId, StorageError> {
        let path = self.config.sequence_path();
        let next = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str::<PlayerSequence>(&contents)?.next_id
        } else {
            // No sequence yet: continue after whatever is already on disk.
            match self.players().read_all()?.iter().map(|p| p.id).max() {
                Some(last) => last.next().ok_or(StorageError::IdsExhausted)?,
                None => PlayerId::new(1),
            }
        };

        // Advanced before the player line is appended: a failed append burns
        // an id but can never hand the same id out twice.
        fs::create_dir_all(self.config.state_dir())?;
        let sequence = PlayerSequence {
            next_id: next.next().ok_or(StorageError::IdsExhausted)?,
        };
        fs::write(&path, serde_json::to_string(&sequence)?)?;

        Ok(next)
    }
}

impl Repository for JsonlRepository {
    fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        self.players().read_all()
    }

    fn list_matches(&self) -> Result<Vec<Match>, StorageError> {
        self.matches().read_all()
    }

    fn add_player(&mut self, name: &str) -> Result<Player, StorageError> {
        let id = self.claim_player_id()?;
        let player = Player::new(id, name.to_string());
        JsonlWriter::new(self.config.players_path()).append(&player)?;
        info!(player_id = %id, name = %player.name, "Registered player");
        Ok(player)
    }

    fn record_match(&mut self, winner: PlayerId, loser: PlayerId) -> Result<Match, StorageError> {
        let m = Match::decided(winner, loser);
        JsonlWriter::new(self.config.matches_path()).append(&m)?;
        info!(winner = %winner, loser = %loser, "Recorded match");
        Ok(m)
    }

    fn clear_matches(&mut self) -> Result<(), StorageError> {
        JsonlWriter::<Match>::new(self.config.matches_path()).write_all(&[])?;
        info!("Cleared all matches");
        Ok(())
    }

    fn clear_players(&mut self) -> Result<(), StorageError> {
        JsonlWriter::<Player>::new(self.config.players_path()).write_all(&[])?;
        info!("Cleared all players");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        name: String,
        value: u32,
    }

    fn entity(id: &str, name: &str, value: u32) -> TestEntity {
        TestEntity {
            id: id.to_string(),
            name: name.to_string(),
            value,
        }
    }

    fn test_repo(temp_dir: &TempDir) -> JsonlRepository {
        JsonlRepository::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");

        let entities = vec![entity("1", "First", 100), entity("2", "Second", 200)];

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        let count = writer.write_all(&entities).unwrap();
        assert_eq!(count, 2);

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        let read_entities = reader.read_all().unwrap();

        assert_eq!(read_entities, entities);
    }

    #[test]
    fn test_jsonl_append() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("append.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);

        writer.append(&entity("1", "First", 100)).unwrap();
        writer.append(&entity("2", "Second", 200)).unwrap();

        let entities = reader.read_all().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].name, "Second");
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_rejects_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        std::fs::write(
            &path,
            r#"{"id":"1","name":"Good","value":1}
not-valid-json

{"id":"2","name":"Also Good","value":2}
"#,
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path.clone());
        match reader.read_all() {
            Err(StorageError::Malformed {
                path: bad_path,
                line,
                ..
            }) => {
                assert_eq!(bad_path, path);
                assert_eq!(line, 2);
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_all_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank_lines.jsonl");

        std::fs::write(
            &path,
            "{\"id\":\"1\",\"name\":\"A\",\"value\":1}\n\n   \n{\"id\":\"2\",\"name\":\"B\",\"value\":2}\n",
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_repository_truncated_player_line_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);
        for name in ["A", "B", "C", "D"] {
            repo.add_player(name).unwrap();
        }

        let path = repo.config().players_path();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
        let half = lines[2].len() / 2;
        lines[2].truncate(half);
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();

        assert!(matches!(
            repo.list_players(),
            Err(StorageError::Malformed { line: 3, .. })
        ));
        assert!(repo.count_players().is_err());
    }

    #[test]
    fn test_repository_sequence_exhausted() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);

        std::fs::create_dir_all(repo.config().state_dir()).unwrap();
        std::fs::write(
            repo.config().sequence_path(),
            format!("{{\"next_id\":{}}}", u32::MAX),
        )
        .unwrap();

        assert!(matches!(
            repo.add_player("Alice"),
            Err(StorageError::IdsExhausted)
        ));
    }

    #[test]
    fn test_entity_type_filename() {
        assert_eq!(EntityType::Player.filename(), "players.jsonl");
        assert_eq!(EntityType::Match.filename(), "matches.jsonl");
    }

    #[test]
    fn test_repository_assigns_sequential_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);

        let a = repo.add_player("Alice").unwrap();
        let b = repo.add_player("Bob").unwrap();

        assert_eq!(a.id, PlayerId::new(1));
        assert_eq!(b.id, PlayerId::new(2));
        assert_eq!(repo.count_players().unwrap(), 2);
    }

    #[test]
    fn test_repository_ids_not_reused_after_clear() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);

        repo.add_player("Alice").unwrap();
        repo.add_player("Bob").unwrap();
        repo.clear_players().unwrap();
        assert_eq!(repo.count_players().unwrap(), 0);

        let c = repo.add_player("Carol").unwrap();
        assert_eq!(c.id, PlayerId::new(3));
    }

    #[test]
    fn test_repository_failed_append_burns_id() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());
        let mut repo = JsonlRepository::new(config.clone());
        repo.add_player("Alice").unwrap();

        // A directory in place of the players file makes the append fail
        std::fs::remove_file(config.players_path()).unwrap();
        std::fs::create_dir(config.players_path()).unwrap();
        assert!(matches!(repo.add_player("Bob"), Err(StorageError::Io(_))));

        std::fs::remove_dir(config.players_path()).unwrap();
        let carol = repo.add_player("Carol").unwrap();
        assert_eq!(carol.id, PlayerId::new(3));
    }

    #[test]
    fn test_repository_sequence_resumes_from_existing_players() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        JsonlWriter::new(config.players_path())
            .write_all(&[Player::new(PlayerId::new(7), "Seeded".to_string())])
            .unwrap();

        let mut repo = JsonlRepository::new(config);
        let next = repo.add_player("Next").unwrap();
        assert_eq!(next.id, PlayerId::new(8));
    }

    #[test]
    fn test_repository_record_and_clear_matches() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);

        let a = repo.add_player("Alice").unwrap();
        let b = repo.add_player("Bob").unwrap();
        repo.record_match(a.id, b.id).unwrap();

        let matches = repo.list_matches().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].home, a.id);
        assert_eq!(matches[0].visitor, b.id);
        assert_eq!(matches[0].winner, Some(a.id));

        repo.clear_matches().unwrap();
        assert!(repo.list_matches().unwrap().is_empty());
        // Players survive a match reset
        assert_eq!(repo.count_players().unwrap(), 2);
    }

    #[test]
    fn test_repository_clear_on_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);

        repo.clear_matches().unwrap();
        repo.clear_players().unwrap();
        assert_eq!(repo.count_players().unwrap(), 0);
    }

    #[test]
    fn test_repository_corrupt_sequence_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut repo = test_repo(&temp_dir);

        std::fs::create_dir_all(repo.config().state_dir()).unwrap();
        std::fs::write(repo.config().sequence_path(), "garbage").unwrap();

        assert!(matches!(
            repo.add_player("Alice"),
            Err(StorageError::Json(_))
        ));
    }
}
