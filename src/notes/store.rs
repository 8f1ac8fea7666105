use super::types::Note;
use crate::error::NoteError;
use crate::kernel::text::to_lower_tr;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Persistence for captured notes. Last writer wins.
pub trait NoteStore: Send {
    fn insert(&mut self, note: Note) -> Result<(), NoteError>;
    fn remove(&mut self, id: Uuid) -> Result<Note, NoteError>;
    /// Newest first.
    fn all(&self) -> Vec<Note>;
    fn search(&self, query: &str) -> Vec<Note> {
        let query = to_lower_tr(query.trim());
        self.all()
            .into_iter()
            .filter(|n| to_lower_tr(&n.text).contains(&query))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: Vec<Note>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for InMemoryNoteStore {
    fn insert(&mut self, note: Note) -> Result<(), NoteError> {
        self.notes.push(note);
        Ok(())
    }

    fn remove(&mut self, id: Uuid) -> Result<Note, NoteError> {
        take_by_id(&mut self.notes, id)
    }

    fn all(&self) -> Vec<Note> {
        newest_first(&self.notes)
    }
}

/// Whole-file JSON snapshot, rewritten on every change.
#[derive(Debug)]
pub struct FileNoteStore {
    path: PathBuf,
    notes: Vec<Note>,
}

impl FileNoteStore {
    /// Opens the store, reading existing notes if the file is there.
    pub fn open(path: PathBuf) -> Result<Self, NoteError> {
        let mut store = Self { path, notes: Vec::new() };
        store.load()?;
        Ok(store)
    }

    pub fn load(&mut self) -> Result<(), NoteError> {
        match fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => self.notes.clear(),
            Ok(data) => self.notes = serde_json::from_str(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.notes.clear(),
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), NoteError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.notes)?;
        // Write-then-rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl NoteStore for FileNoteStore {
    fn insert(&mut self, note: Note) -> Result<(), NoteError> {
        self.notes.push(note);
        self.save()
    }

    fn remove(&mut self, id: Uuid) -> Result<Note, NoteError> {
        let removed = take_by_id(&mut self.notes, id)?;
        self.save()?;
        Ok(removed)
    }

    fn all(&self) -> Vec<Note> {
        newest_first(&self.notes)
    }
}

fn take_by_id(notes: &mut Vec<Note>, id: Uuid) -> Result<Note, NoteError> {
    let idx = notes
        .iter()
        .position(|n| n.id == id)
        .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
    Ok(notes.remove(idx))
}

fn newest_first(notes: &[Note]) -> Vec<Note> {
    let mut out = notes.to_vec();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}
