use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{info, instrument};

use super::FetchContext;
use crate::error::{GatewayError, Result};
use crate::model::FormSubmission;

pub const COLLECTION: &str = "form-submissions";
const MAX_MESSAGE_CHARS: usize = 5000;
const MAX_FIELD_CHARS: usize = 200;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Trim every field and drop blank optional ones.
pub fn normalize(mut form: FormSubmission) -> FormSubmission {
    let tidy = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    form.name = form.name.trim().to_string();
    form.email = form.email.trim().to_string();
    form.phone = tidy(form.phone);
    form.message = tidy(form.message);
    form.program = tidy(form.program);
    form.grade = tidy(form.grade);
    form.source_page = tidy(form.source_page);
    form
}

pub fn validate(form: &FormSubmission) -> Result<()> {
    if form.name.is_empty() {
        return Err(GatewayError::invalid("name is required"));
    }
    if form.name.chars().count() > MAX_FIELD_CHARS {
        return Err(GatewayError::invalid("name is too long"));
    }
    if form.email.is_empty() {
        return Err(GatewayError::invalid("email is required"));
    }
    if !EMAIL_RE.is_match(&form.email) {
        return Err(GatewayError::invalid("email is not a valid address"));
    }
    if let Some(phone) = &form.phone {
        if phone.chars().count() > 40 {
            return Err(GatewayError::invalid("phone is too long"));
        }
    }
    if let Some(message) = &form.message {
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(GatewayError::invalid("message is too long"));
        }
    }
    Ok(())
}

/// Validate and store a contact form in the CMS. Returns the created record's id.
#[instrument(skip_all)]
pub async fn submit(ctx: &FetchContext, form: FormSubmission) -> Result<Value> {
    let form = normalize(form);
    validate(&form)?;
    let data = serde_json::to_value(&form)?;
    let created = ctx.cms().create(COLLECTION, &data).await?;
    let id = created
        .get("documentId")
        .or_else(|| created.get("id"))
        .cloned()
        .unwrap_or(Value::Null);
    info!(%id, "form submission stored");
    Ok(id)
}
