//! Body assembly for the three body modes.

use super::error::AssembleError;
use crate::models::{BodyMode, FieldKind, FormField, HttpMethod, RequestBody};
use std::path::Path;

/// Transport-ready body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssembledBody {
    /// Nothing is sent.
    #[default]
    None,
    /// Raw text sent verbatim, without an implied content type.
    Raw(String),
    /// Multipart form parts in row order.
    Multipart(Vec<FormPart>),
}

impl AssembledBody {
    pub fn is_none(&self) -> bool {
        matches!(self, AssembledBody::None)
    }

    /// Number of payload bytes (file parts count their contents).
    pub fn len(&self) -> usize {
        match self {
            AssembledBody::None => 0,
            AssembledBody::Raw(text) => text.len(),
            AssembledBody::Multipart(parts) => parts.iter().map(FormPart::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub content: PartContent,
}

impl FormPart {
    fn len(&self) -> usize {
        match &self.content {
            PartContent::Text(text) => text.len(),
            PartContent::File { bytes, .. } => bytes.len(),
        }
    }
}

/// Payload of a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// Builds the body for `method` from a body descriptor.
///
/// `GET` never carries a body. A raw body that is absent or empty sends
/// nothing; so does a form-data body without a field list. Disabled form
/// fields are dropped. File fields are read from the path held in their value.
pub fn build_body(method: HttpMethod, body: &RequestBody) -> Result<AssembledBody, AssembleError> {
    if method == HttpMethod::GET {
        return Ok(AssembledBody::None);
    }

    match body.mode {
        BodyMode::None => Ok(AssembledBody::None),
        BodyMode::Raw => Ok(match body.raw.as_deref() {
            Some(raw) if !raw.is_empty() => AssembledBody::Raw(raw.to_string()),
            _ => AssembledBody::None,
        }),
        BodyMode::FormData => match body.form_data.as_deref() {
            Some(fields) => {
                let parts = fields
                    .iter()
                    .filter(|f| f.enabled)
                    .map(build_part)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AssembledBody::Multipart(parts))
            }
            None => Ok(AssembledBody::None),
        },
    }
}

fn build_part(field: &FormField) -> Result<FormPart, AssembleError> {
    let content = match field.kind {
        FieldKind::Text => PartContent::Text(field.value.clone()),
        FieldKind::File => {
            let path = Path::new(&field.value);
            let bytes = std::fs::read(path).map_err(|source| AssembleError::FormFile {
                path: field.value.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| field.value.clone());
            PartContent::File { file_name, bytes }
        }
    };

    Ok(FormPart {
        name: field.key.clone(),
        content,
    })
}
