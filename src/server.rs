//! Mock HTTP server integration.
//!
//! Fixtures are served through [`mockito`]: [`MockFixture`] fills a mock's
//! status, content type and body from an annotated record, and
//! [`FixtureServer`] registers such mocks by method and path. Mocks and the
//! server are torn down when dropped.
//!
//! ```no_run
//! use jsonapi_fixture::{Field, FixtureServer, Resource};
//!
//! struct Widget {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Resource for Widget {
//!     fn fields(&self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::primary("primary,widgets", &self.id),
//!             Field::attr("attr,name", &self.name),
//!         ]
//!     }
//! }
//!
//! let mut server = FixtureServer::new();
//! let widget = Widget { id: "42".into(), name: "bolt".into() };
//! let _mock = server.resource("GET", "/widgets/42", 200, &widget).unwrap();
//! let base_url = server.url();
//! ```

use mockito::{Mock, Server, ServerGuard};
use serde::Serialize;

use crate::emit::{emit_error, emit_raw, emit_resource, emit_resource_list, RecordedResponse};
use crate::error::EmitError;
use crate::record::Resource;

/// Fixture bodies for [`mockito::Mock`].
pub trait MockFixture: Sized {
    /// Apply a recorded status, content type and body.
    fn with_response(self, response: &RecordedResponse) -> Self;

    fn with_resource<R: Resource + ?Sized>(self, status: u16, record: &R) -> Result<Self, EmitError> {
        let mut response = RecordedResponse::new();
        emit_resource(&mut response, status, record)?;
        Ok(self.with_response(&response))
    }

    fn with_resource_list<I>(self, status: u16, records: I) -> Result<Self, EmitError>
    where
        I: IntoIterator,
        I::Item: Resource,
    {
        let mut response = RecordedResponse::new();
        emit_resource_list(&mut response, status, records)?;
        Ok(self.with_response(&response))
    }

    fn with_error(self, status: u16, detail: &str) -> Result<Self, EmitError> {
        let mut response = RecordedResponse::new();
        emit_error(&mut response, status, detail)?;
        Ok(self.with_response(&response))
    }

    fn with_raw<T: Serialize + ?Sized>(self, status: u16, value: &T) -> Result<Self, EmitError> {
        let mut response = RecordedResponse::new();
        emit_raw(&mut response, status, value)?;
        Ok(self.with_response(&response))
    }
}

impl MockFixture for Mock {
    fn with_response(self, response: &RecordedResponse) -> Self {
        let mut mock = self;
        if let Some(status) = response.status {
            mock = mock.with_status(usize::from(status));
        }
        if let Some(content_type) = &response.content_type {
            mock = mock.with_header("content-type", content_type);
        }
        mock.with_body(&response.body)
    }
}

/// A running mock server serving fixture documents.
pub struct FixtureServer {
    server: ServerGuard,
}

impl FixtureServer {
    /// Start a server on a free local port.
    pub fn new() -> Self {
        let server = Server::new();
        tracing::debug!(url = %server.url(), "fixture server started");
        Self { server }
    }

    /// Base URL of the running server, e.g. `http://127.0.0.1:1234`.
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// The underlying mockito server, for matchers this type does not cover.
    pub fn inner(&mut self) -> &mut ServerGuard {
        &mut self.server
    }

    /// Serve a single resource document at `method path`.
    pub fn resource<R: Resource + ?Sized>(
        &mut self,
        method: &str,
        path: &str,
        status: u16,
        record: &R,
    ) -> Result<Mock, EmitError> {
        Ok(self
            .server
            .mock(method, path)
            .with_resource(status, record)?
            .create())
    }

    /// Serve a collection document at `method path`.
    pub fn resource_list<I>(
        &mut self,
        method: &str,
        path: &str,
        status: u16,
        records: I,
    ) -> Result<Mock, EmitError>
    where
        I: IntoIterator,
        I::Item: Resource,
    {
        Ok(self
            .server
            .mock(method, path)
            .with_resource_list(status, records)?
            .create())
    }

    /// Serve an error document at `method path`.
    pub fn error(
        &mut self,
        method: &str,
        path: &str,
        status: u16,
        detail: &str,
    ) -> Result<Mock, EmitError> {
        Ok(self
            .server
            .mock(method, path)
            .with_error(status, detail)?
            .create())
    }

    /// Serve any serializable value as plain JSON at `method path`.
    pub fn raw<T: Serialize + ?Sized>(
        &mut self,
        method: &str,
        path: &str,
        status: u16,
        value: &T,
    ) -> Result<Mock, EmitError> {
        Ok(self
            .server
            .mock(method, path)
            .with_raw(status, value)?
            .create())
    }
}

impl Default for FixtureServer {
    fn default() -> Self {
        Self::new()
    }
}
