use reqwest::multipart::{Form, Part};

use crate::draft::{Capacity, EventDraft, ImageUpload};
use crate::models::hhmm;
use crate::utils::error::ApiError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Multipart body of an event create or update, as ordered text fields
/// plus the optional poster upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPayload {
    fields: Vec<(&'static str, String)>,
    image: Option<ImageUpload>,
}

impl EventPayload {
    pub fn from_draft(draft: &EventDraft) -> Result<Self, serde_json::Error> {
        let mut payload = Self {
            fields: Vec::new(),
            image: draft.media.image.clone(),
        };

        let location = &draft.location;
        payload.push("location_type", location.location_type.as_str());
        if location.location_type.has_venue() {
            payload.push_non_empty("venue", &location.venue);
            payload.push_non_empty("address", &location.address);
        }
        if location.location_type.has_link() {
            payload.push_non_empty("online_link", &location.online_link);
        }

        let schedule = &draft.schedule;
        if let Some(date) = schedule.start_date {
            payload.push("start_date", date.format(DATE_FORMAT).to_string());
        }
        if let Some(time) = schedule.start_time {
            payload.push("start_time", time.format(hhmm::FORMAT).to_string());
        }
        if let Some(date) = schedule.end_date {
            payload.push("end_date", date.format(DATE_FORMAT).to_string());
        }
        if let Some(time) = schedule.end_time {
            payload.push("end_time", time.format(hhmm::FORMAT).to_string());
        }

        if let Some(category) = &draft.category.category {
            payload.push("category_id", category.as_str());
        }
        if !draft.category.interests.is_empty() {
            payload.push("interests", serde_json::to_string(&draft.category.interests)?);
        }

        payload.push("title", draft.media.name.trim());
        if let Some(url) = &draft.media.image_url {
            payload.push("image_url", url.as_str());
        }
        payload.push("description", draft.details.description.trim());

        match draft.details.capacity {
            Capacity::Unlimited => payload.push("is_unlimited", "true"),
            Capacity::Limited(limit) => {
                payload.push("is_unlimited", "false");
                payload.push("capacity", limit.to_string());
            }
        }

        payload.push("is_free", draft.pricing.is_free.to_string());
        if !draft.pricing.is_free {
            payload.push("ticket_types", serde_json::to_string(&draft.ticket_records())?);
        }

        if !draft.promo_codes.is_empty() {
            payload.push("promo_codes", serde_json::to_string(&draft.promo_codes)?);
        }

        Ok(payload)
    }

    fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.fields.push((key, value.into()));
    }

    fn push_non_empty(&mut self, key: &'static str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.push(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value));

        if let Some(image) = self.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|e| ApiError::InvalidUpload(format!("unsupported image type: {e}")))?;
            form = form.part("image", part);
        }

        Ok(form)
    }
}
