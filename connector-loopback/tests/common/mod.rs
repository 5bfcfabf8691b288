#![allow(dead_code)]

use connector_core::ConnectorConfig;
use std::{
    error::Error,
    io::Write,
    sync::atomic::{AtomicU32, Ordering},
};
use tempfile::NamedTempFile;

pub type TestResult = Result<(), Box<dyn Error + Send + Sync + 'static>>;

pub const PUB_PARTICIPANT: &str = "MyParticipantLibrary::MyPubParticipant";
pub const SUB_PARTICIPANT: &str = "MyParticipantLibrary::MySubParticipant";

const SHAPE_EXAMPLE: &str = include_str!("../fixtures/ShapeExample.xml");

static NEXT_DOMAIN: AtomicU32 = AtomicU32::new(1);

/// The shape example on a domain id no other test in this binary uses.
///
/// Loopback delivery is process-wide, so tests running in parallel must not
/// share a domain.
pub struct ShapeConfig {
    file: NamedTempFile,
    pub domain_id: u32,
}

impl ShapeConfig {
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync + 'static>> {
        let domain_id = NEXT_DOMAIN.fetch_add(1, Ordering::Relaxed);
        let xml = SHAPE_EXAMPLE.replace(
            r#"domain_id="0""#,
            &format!(r#"domain_id="{domain_id}""#),
        );
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile()?;
        file.write_all(xml.as_bytes())?;
        file.flush()?;
        Ok(ShapeConfig { file, domain_id })
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    pub fn participant(&self, name: &str) -> connector_core::Result<ConnectorConfig> {
        ConnectorConfig::new(name, self.path())
    }
}
