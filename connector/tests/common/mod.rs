#![allow(dead_code)]

use connector::Connector;
use std::{
    error::Error,
    io::Write,
    path::Path,
    sync::atomic::{AtomicU32, Ordering},
};
use tempfile::NamedTempFile;

pub type TestResult = Result<(), Box<dyn Error + Send + Sync + 'static>>;

pub const PUB_PARTICIPANT: &str = "MyParticipantLibrary::MyPubParticipant";
pub const SUB_PARTICIPANT: &str = "MyParticipantLibrary::MySubParticipant";
pub const PUBSUB_PARTICIPANT: &str = "MyParticipantLibrary::MyPubSubParticipant";
pub const SQUARE_WRITER: &str = "MyPublisher::MySquareWriter";
pub const SQUARE_READER: &str = "MySubscriber::MySquareReader";
pub const LATEST_SQUARE_READER: &str = "MySubscriber::MyLatestSquareReader";

const SHAPE_EXAMPLE: &str = include_str!("../fixtures/ShapeExample.xml");

static NEXT_DOMAIN: AtomicU32 = AtomicU32::new(1);

/// The shape example on a domain id of its own, so tests running in
/// parallel in one process never see each other's samples.
pub struct Shapes {
    file: NamedTempFile,
}

impl Shapes {
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync + 'static>> {
        let domain_id = NEXT_DOMAIN.fetch_add(1, Ordering::Relaxed);
        let xml = SHAPE_EXAMPLE.replace(
            r#"domain_id="0""#,
            &format!(r#"domain_id="{domain_id}""#),
        );
        let mut file = tempfile::Builder::new().suffix(".xml").tempfile()?;
        file.write_all(xml.as_bytes())?;
        file.flush()?;
        Ok(Shapes { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn publisher(&self) -> connector::Result<Connector> {
        Connector::new(PUB_PARTICIPANT, self.path())
    }

    pub fn subscriber(&self) -> connector::Result<Connector> {
        Connector::new(SUB_PARTICIPANT, self.path())
    }

    /// A participant with both a writer and a reader on `Square`.
    pub fn pubsub(&self) -> connector::Result<Connector> {
        Connector::new(PUBSUB_PARTICIPANT, self.path())
    }
}
