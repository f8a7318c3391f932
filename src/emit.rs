//! Response emission.
//!
//! Each `emit_*` function performs exactly one response write: the head
//! (status and content type), then the encoded body. Documents are mapped
//! before anything is written, so a mapping error leaves the writer untouched.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::EmitError;
use crate::mapper::{error_document, resource_document, resource_list_document};
use crate::record::Resource;
use crate::types::{JSONAPI_CONTENT_TYPE, JSON_CONTENT_TYPE};

/// Destination of a fixture response.
pub trait ResponseWriter {
    /// Send the status line and content type.
    fn write_head(&mut self, status: u16, content_type: &str) -> std::io::Result<()>;

    /// Send the response body.
    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn write_head(&mut self, status: u16, content_type: &str) -> std::io::Result<()> {
        (**self).write_head(status, content_type)
    }

    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        (**self).write_body(body)
    }
}

/// In-memory response, filled by one `emit_*` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedResponse {
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// True until a head has been written.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.body.is_empty()
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Body as UTF-8 text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ResponseWriter for RecordedResponse {
    fn write_head(&mut self, status: u16, content_type: &str) -> std::io::Result<()> {
        self.status = Some(status);
        self.content_type = Some(content_type.to_string());
        Ok(())
    }

    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

/// Write a single resource document.
///
/// # Errors
///
/// Returns `EmitError::Map` (nothing written) if the record cannot be mapped,
/// or `EmitError::Io` if the writer fails.
pub fn emit_resource<W, R>(writer: &mut W, status: u16, record: &R) -> Result<(), EmitError>
where
    W: ResponseWriter + ?Sized,
    R: Resource + ?Sized,
{
    let document = resource_document(record)?;
    write_document(writer, status, JSONAPI_CONTENT_TYPE, &document)
}

/// Write a collection document. Relationships are not included.
///
/// # Errors
///
/// Returns `EmitError::Map` (nothing written) if a record cannot be mapped,
/// or `EmitError::Io` if the writer fails.
pub fn emit_resource_list<W, I>(writer: &mut W, status: u16, records: I) -> Result<(), EmitError>
where
    W: ResponseWriter + ?Sized,
    I: IntoIterator,
    I::Item: Resource,
{
    let document = resource_list_document(records)?;
    write_document(writer, status, JSONAPI_CONTENT_TYPE, &document)
}

/// Write an error document with `status` echoed as text.
pub fn emit_error<W>(writer: &mut W, status: u16, detail: &str) -> Result<(), EmitError>
where
    W: ResponseWriter + ?Sized,
{
    let document = error_document(status, detail);
    write_document(writer, status, JSONAPI_CONTENT_TYPE, &document)
}

/// Write any serializable value as plain JSON.
///
/// # Errors
///
/// Returns `EmitError::Encode` if `value` cannot be encoded. The head has
/// already been written at that point.
pub fn emit_raw<W, T>(writer: &mut W, status: u16, value: &T) -> Result<(), EmitError>
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    write_document(writer, status, JSON_CONTENT_TYPE, value)
}

fn write_document<W, T>(
    writer: &mut W,
    status: u16,
    content_type: &str,
    document: &T,
) -> Result<(), EmitError>
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    writer.write_head(status, content_type)?;
    let body = serde_json::to_vec(document).map_err(|e| {
        error!(status, error = %e, "response head sent but body failed to encode");
        EmitError::Encode(e)
    })?;
    debug!(status, content_type, bytes = body.len(), "writing fixture response");
    writer.write_body(&body)?;
    Ok(())
}
