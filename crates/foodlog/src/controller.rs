//! Form controller and delete flow.
//!
//! A [`FormController`] turns a submitted [`FoodForm`] into a stored
//! [`FoodRecord`] and removes records after confirmation. While one of its
//! operations runs the controller reports itself busy and refuses a second
//! one, so a double tap cannot submit twice.
//!
//! All mutations from controllers sharing an [`AppState`] hold the state's
//! write lock across their read-modify-write, so two forms open at once
//! cannot drop each other's changes.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::form::FoodForm;
use crate::record::{FoodRecord, RecordId};
use crate::state::AppState;

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Return `true` to go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// What a delete request did.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was touched.
    Cancelled,
    /// No record had the id.
    NotFound,
    /// The record was removed.
    Deleted(FoodRecord),
}

/// Clears the busy flag when an operation ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Saves and deletes food records on behalf of one form.
#[derive(Debug, Clone)]
pub struct FormController {
    state: AppState,
    busy: Arc<AtomicBool>,
}

impl FormController {
    /// Create a controller working against `state`.
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if a submit or delete is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<BusyGuard<'_>> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }
        Ok(BusyGuard(&self.busy))
    }

    /// Validate and store the form.
    ///
    /// New records get an id past every stored one; edits keep theirs. A
    /// picked image is copied into the private image directory unless it is
    /// the edited record's current copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] without touching storage if the form is
    /// invalid, [`Error::Busy`] if another operation is running,
    /// [`Error::RecordNotFound`] if the edited record no longer exists, or
    /// the image copy or write error.
    #[instrument(skip(self, form), fields(edit = form.is_edit()))]
    pub async fn submit(&self, form: &FoodForm) -> Result<FoodRecord> {
        let _busy = self.begin()?;
        let food = form.validate()?;

        let _write = self.state.write_lock.lock().await;

        let (id, current) = match &food.editing {
            Some(id) => {
                let current = self
                    .state
                    .store
                    .get(id)
                    .await
                    .ok_or_else(|| Error::not_found(id))?;
                (id.clone(), Some(current))
            }
            None => {
                let records = self.state.store.load().await;
                (RecordId::generate_after(records.iter().map(|r| &r.id)), None)
            }
        };
        let is_new = current.is_none();

        // Only the edited record's own copy is reused; any other file,
        // including another record's copy, is imported afresh.
        let own_image = current.as_ref().and_then(FoodRecord::image_path);
        let mut imported = None;
        let image_uri = match &food.image {
            Some(path) if own_image == Some(path.as_path()) => {
                Some(path.to_string_lossy().into_owned())
            }
            Some(path) => {
                let copy = self.state.images.import(path, &id).await?;
                let uri = copy.to_string_lossy().into_owned();
                imported = Some(copy);
                Some(uri)
            }
            None => None,
        };

        let record = food.into_record(id, image_uri);
        let stored = if is_new {
            self.state.store.insert(record.clone()).await.map(|()| None)
        } else {
            self.state.store.replace(record.clone()).await.map(Some)
        };

        match stored {
            Ok(previous) => {
                let old_image = previous.and_then(|p| p.image_uri);
                if let Some(old) = old_image.filter(|old| record.image_uri.as_ref() != Some(old)) {
                    self.state.images.discard(Path::new(&old)).await;
                }
                info!(id = %record.id, name = %record.food_name, "Saved food record");
                Ok(record)
            }
            Err(e) => {
                if let Some(copy) = imported {
                    self.state.images.discard(&copy).await;
                }
                warn!(id = %record.id, error = %e, "Saving food record failed");
                Err(e)
            }
        }
    }

    /// Ask for confirmation, then delete the record with `id`.
    ///
    /// The record's private image copy is removed with it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if another operation is running, or the write
    /// error.
    #[instrument(skip(self, id, confirm), fields(id = %id))]
    pub async fn delete<C: Confirm>(&self, id: &RecordId, confirm: C) -> Result<DeleteOutcome> {
        let _busy = self.begin()?;

        if !confirm.confirm("Delete this food record?") {
            return Ok(DeleteOutcome::Cancelled);
        }

        let _write = self.state.write_lock.lock().await;
        match self.state.store.remove(id).await? {
            Some(record) => {
                if let Some(image) = record.image_path() {
                    self.state.images.discard(image).await;
                }
                info!(name = %record.food_name, "Deleted food record");
                Ok(DeleteOutcome::Deleted(record))
            }
            None => Ok(DeleteOutcome::NotFound),
        }
    }
}
