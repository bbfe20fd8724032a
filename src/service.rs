use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::nlp::{PromptAnalysis, TagNormalizer, find_similar_prompts};
use crate::search::{SearchEngine, SearchHistory, SearchOptions};
use crate::store::{read_json, write_json};
use crate::{Database, Prompt, PromptBuilder, PromptError, PromptId};

/// Store key holding the JSON array of prompts.
pub const PROMPTS_KEY: &str = "prompts";

/// Service layer providing prompt library operations.
///
/// PromptService owns the backing [`Database`] and a [`SearchEngine`], and
/// exposes the CRUD, import/export and analysis operations a front end
/// needs. It is UI-independent: the CLI is one consumer.
///
/// # Examples
///
/// ```
/// use promptlib::{Database, PromptService};
///
/// # fn main() -> anyhow::Result<()> {
/// let db = Database::in_memory()?;
/// let service = PromptService::new(db);
/// let prompt = service.create_prompt("Greeting", "Say hello politely", &[])?;
/// assert_eq!(service.list_prompts()?.len(), 1);
/// assert_eq!(service.get_prompt(&prompt.id)?, Some(prompt));
/// # Ok(())
/// # }
/// ```
pub struct PromptService {
    db: Database,
    engine: SearchEngine,
}

/// Partial edit of a prompt. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Outcome of merging an imported library into the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Prompts found in the import payload.
    pub total: usize,
    /// Prompts actually added (ids not already present).
    pub imported: usize,
}

impl ImportReport {
    pub fn skipped(&self) -> usize {
        self.total - self.imported
    }
}

impl PromptService {
    /// Creates a new PromptService with the given database.
    ///
    /// History starts empty; call [`load_history`](Self::load_history) to
    /// restore it from the database.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            engine: SearchEngine::new(),
        }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns every stored prompt in insertion order.
    pub fn list_prompts(&self) -> Result<Vec<Prompt>> {
        let prompts = read_json::<Vec<Prompt>>(&self.db, PROMPTS_KEY)
            .context("Failed to read prompt library")?
            .unwrap_or_default();
        Ok(prompts)
    }

    fn save_prompts(&self, prompts: &[Prompt]) -> Result<()> {
        write_json(&self.db, PROMPTS_KEY, prompts).context("Failed to save prompt library")?;
        debug!(count = prompts.len(), "prompt library saved");
        Ok(())
    }

    /// Retrieves a prompt by id. Returns `None` if it does not exist.
    pub fn get_prompt(&self, id: &PromptId) -> Result<Option<Prompt>> {
        Ok(self.list_prompts()?.into_iter().find(|p| &p.id == id))
    }

    /// Creates and stores a new prompt.
    ///
    /// Title and content are trimmed and must not be empty. Tags are trimmed
    /// and deduplicated. Both timestamps are set to now.
    pub fn create_prompt(&self, title: &str, content: &str, tags: &[String]) -> Result<Prompt> {
        let title = required("title", title)?;
        let content = required("content", content)?;

        let prompt = PromptBuilder::new()
            .title(title)
            .content(content)
            .tags(TagNormalizer::dedupe(tags.iter().cloned()))
            .created_at(OffsetDateTime::now_utc())
            .build();

        let mut prompts = self.list_prompts()?;
        prompts.push(prompt.clone());
        self.save_prompts(&prompts)?;

        info!(id = %prompt.id, "prompt created");
        Ok(prompt)
    }

    /// Applies an edit to an existing prompt and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::NotFound`] if no prompt has this id, or
    /// [`PromptError::EmptyField`] if the edit blanks the title or content.
    pub fn update_prompt(&self, id: &PromptId, update: PromptUpdate) -> Result<Prompt> {
        let mut prompts = self.list_prompts()?;
        let prompt = prompts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| PromptError::NotFound(id.clone()))?;

        if let Some(title) = update.title {
            prompt.title = required("title", &title)?;
        }
        if let Some(content) = update.content {
            prompt.content = required("content", &content)?;
        }
        if let Some(tags) = update.tags {
            prompt.tags = TagNormalizer::dedupe(tags);
        }
        prompt.updated_at = OffsetDateTime::now_utc().max(prompt.created_at);

        let updated = prompt.clone();
        self.save_prompts(&prompts)?;

        info!(id = %updated.id, "prompt updated");
        Ok(updated)
    }

    /// Deletes a prompt.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::NotFound`] if no prompt has this id.
    pub fn delete_prompt(&self, id: &PromptId) -> Result<()> {
        let mut prompts = self.list_prompts()?;
        let before = prompts.len();
        prompts.retain(|p| &p.id != id);

        if prompts.len() == before {
            return Err(PromptError::NotFound(id.clone()).into());
        }

        self.save_prompts(&prompts)?;
        info!(id = %id, "prompt deleted");
        Ok(())
    }

    /// Returns every distinct tag in the library, sorted.
    pub fn all_tags(&self) -> Result<Vec<String>> {
        let tags: BTreeSet<String> = self
            .list_prompts()?
            .into_iter()
            .flat_map(|p| p.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Populates an empty library with starter prompts.
    ///
    /// Does nothing if any prompt already exists. Returns the number added.
    pub fn seed_examples(&self) -> Result<usize> {
        if !self.list_prompts()?.is_empty() {
            return Ok(0);
        }

        let now = OffsetDateTime::now_utc();
        let examples = vec![
            PromptBuilder::new()
                .id("example1")
                .title("Creative Writing")
                .content(
                    "Write a short story about [TOPIC] that includes themes of [THEME] and has a character who [CHARACTER TRAIT].",
                )
                .tags(vec!["writing".to_string(), "creative".to_string()])
                .created_at(now)
                .build(),
            PromptBuilder::new()
                .id("example2")
                .title("Code Explanation")
                .content(
                    "Explain this code in simple terms and suggest any improvements:\n\n[CODE]",
                )
                .tags(vec!["programming".to_string(), "code".to_string()])
                .created_at(now)
                .build(),
        ];

        self.save_prompts(&examples)?;
        info!(count = examples.len(), "seeded example prompts");
        Ok(examples.len())
    }

    /// Serializes the whole library as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        let prompts = self.list_prompts()?;
        serde_json::to_string_pretty(&prompts).context("Failed to serialize prompt library")
    }

    /// Merges a JSON array of prompts into the library.
    ///
    /// Prompts whose id already exists (or repeats within the payload) are
    /// skipped; everything else is appended in payload order.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::InvalidImport`] if the payload is not JSON, is
    /// not an array, or contains an entry that is not a prompt.
    pub fn import_json(&self, raw: &str) -> Result<ImportReport> {
        let incoming = parse_import(raw)?;
        let mut prompts = self.list_prompts()?;
        let mut known: HashSet<PromptId> = prompts.iter().map(|p| p.id.clone()).collect();

        let total = incoming.len();
        let mut imported = 0;
        for prompt in incoming {
            if known.insert(prompt.id.clone()) {
                prompts.push(prompt);
                imported += 1;
            }
        }

        if imported > 0 {
            self.save_prompts(&prompts)?;
        }

        info!(total, imported, "prompt import finished");
        Ok(ImportReport { total, imported })
    }

    /// Searches the library and records the query in history.
    ///
    /// History is persisted on a best-effort basis: a failed write is logged
    /// and does not fail the search.
    pub fn search(&mut self, options: &SearchOptions) -> Result<Vec<Prompt>> {
        let prompts = self.list_prompts()?;
        let results: Vec<Prompt> = self
            .engine
            .search(&prompts, options)
            .into_iter()
            .cloned()
            .collect();

        if !options.query.trim().is_empty() {
            self.engine.persist_history(&self.db);
        }
        Ok(results)
    }

    /// Query completions drawn from history and the library's tags.
    pub fn suggestions(&self, input: &str) -> Result<Vec<String>> {
        let prompts = self.list_prompts()?;
        Ok(self.engine.get_suggestions(input, &prompts))
    }

    /// Prompts most similar to the one with `id`, with their scores.
    pub fn similar_to(&self, id: &PromptId, limit: usize) -> Result<Vec<(Prompt, f64)>> {
        let prompts = self.list_prompts()?;
        let target = prompts
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| PromptError::NotFound(id.clone()))?;

        Ok(find_similar_prompts(target, &prompts, limit)
            .into_iter()
            .map(|similar| (similar.prompt.clone(), similar.similarity))
            .collect())
    }

    /// Runs every text heuristic over the prompt with `id`.
    pub fn analyze(
        &self,
        id: &PromptId,
        keyword_limit: usize,
        tag_limit: usize,
    ) -> Result<PromptAnalysis> {
        let prompt = self
            .get_prompt(id)?
            .ok_or_else(|| PromptError::NotFound(id.clone()))?;
        Ok(PromptAnalysis::of(&prompt, keyword_limit, tag_limit))
    }

    pub fn history(&self) -> &SearchHistory {
        self.engine.history()
    }

    /// Restores search history from the database.
    pub fn load_history(&mut self) -> Result<&SearchHistory> {
        self.engine
            .load_history(&self.db)
            .context("Failed to load search history")
    }

    /// Clears search history in memory and in the database.
    pub fn clear_history(&mut self) -> Result<()> {
        self.engine
            .clear_history(&self.db)
            .context("Failed to clear search history")
    }
}

/// Trims a required text field, rejecting blank values.
fn required(field: &'static str, value: &str) -> Result<String, PromptError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PromptError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn parse_import(raw: &str) -> Result<Vec<Prompt>, PromptError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| PromptError::InvalidImport(format!("not valid JSON: {e}")))?;

    if !value.is_array() {
        return Err(PromptError::InvalidImport(
            "import file should contain an array of prompts".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| PromptError::InvalidImport(format!("malformed prompt: {e}")))
}

#[cfg(test)]
#[path = "service/tests.rs"]
mod tests;
