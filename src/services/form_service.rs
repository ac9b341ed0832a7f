// src/services/form_service.rs
//
// Single-form lookup on top of the detail flow.

use std::sync::Arc;

use crate::domain::Form;
use crate::error::{AppError, AppResult};
use crate::services::DetailService;

pub struct FormService {
    detail: Arc<DetailService>,
}

impl FormService {
    pub fn new(detail: Arc<DetailService>) -> Self {
        Self { detail }
    }

    /// One form of one character, matched by exact name.
    ///
    /// Store and remote failures surface exactly as the detail flow
    /// reported them; a form list that simply lacks the name is its
    /// own, distinguishable error.
    pub async fn load_form(&self, character_id: &str, form_name: &str) -> AppResult<Form> {
        let forms = self.detail.load_forms(character_id).await?;

        forms
            .into_iter()
            .find(|form| form.name == form_name)
            .ok_or_else(|| AppError::FormNotFound {
                character_id: character_id.to_string(),
                name: form_name.to_string(),
            })
    }
}
