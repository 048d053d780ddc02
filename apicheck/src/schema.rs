use crate::{
    error::{Error, Violation},
    ResponseData,
};
use serde_json::Value;
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A registry of schema fixtures known at compile time.
pub trait SchemaName: Copy + Debug + 'static {
    /// File name relative to the fixtures root.
    fn file_name(&self) -> &'static str;

    fn all() -> &'static [Self];
}

/// Resolves schema names to parsed documents under a fixed root directory.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    root: PathBuf,
}

impl SchemaStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads and parses `name` on every call.
    pub fn load(&self, name: &str) -> Result<Value, Error> {
        let path = self.root.join(name);

        let contents = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::SchemaNotFound(path.clone()),
            _ => Error::SchemaIo {
                path: path.clone(),
                source,
            },
        })?;

        debug!(path = %path.display(), "loaded schema");

        serde_json::from_str(&contents).map_err(|source| Error::SchemaParse { path, source })
    }

    pub fn load_named<S: SchemaName>(&self, name: S) -> Result<Value, Error> {
        self.load(name.file_name())
    }

    /// Loads and compiles every registered fixture.
    pub fn verify<S: SchemaName>(&self) -> Result<(), Error> {
        for name in S::all() {
            let schema = self.load_named(*name)?;
            jsonschema::validator_for(&schema).map_err(|e| Error::InvalidSchema(e.to_string()))?;
        }

        Ok(())
    }

    /// Parses the response body and validates it against `name`.
    pub fn validate_response<S: SchemaName>(
        &self,
        response: &ResponseData,
        name: S,
    ) -> Result<Value, Error> {
        let body = response.json()?;
        let schema = self.load_named(name)?;

        validate(&body, &schema)?;

        Ok(body)
    }
}

/// Checks `instance` against `schema`, reporting every violation.
pub fn validate(instance: &Value, schema: &Value) -> Result<(), Error> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| Error::InvalidSchema(e.to_string()))?;

    let violations: Vec<_> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            path: e.instance_path.to_string(),
            reason: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(violations))
    }
}
