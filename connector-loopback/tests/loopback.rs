pub mod common;

use common::{PUB_PARTICIPANT, SUB_PARTICIPANT, ShapeConfig, TestResult};
use connector_core::{ConnectorConfig, Error, Session, Timeout, WriteParams};
use connector_loopback::LoopbackSession;
use serde_json::{Value, json};
use std::{
    thread,
    time::{Duration, Instant},
};

#[test]
fn test_unknown_participant() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let config = shapes.participant("MyParticipantLibrary::Zero")?;
    match LoopbackSession::open(&config) {
        Err(Error::External(msg)) => assert!(msg.contains("MyParticipantLibrary::Zero")),
        _ => panic!("expected an external error"),
    }
    Ok(())
}

#[test]
fn test_missing_file() -> TestResult {
    let config = ConnectorConfig::new(PUB_PARTICIPANT, "/nonexistent/ShapeExample.xml")?;
    assert!(matches!(
        LoopbackSession::open(&config),
        Err(Error::External(_))
    ));
    Ok(())
}

#[test]
fn test_unknown_entities() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    assert_eq!(publisher.config().domain_id, shapes.domain_id);

    for name in ["FakePublisher::MySquareWriter", "MyPublisher::FakeWriter"] {
        assert!(matches!(publisher.writer(name), Err(Error::External(_))));
    }
    // Readers are looked up among subscribers only.
    assert!(matches!(
        publisher.reader("MyPublisher::MySquareWriter"),
        Err(Error::External(_))
    ));
    Ok(())
}

#[test]
fn test_write_then_take() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;

    let writer = publisher.writer("MyPublisher::MySquareWriter")?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;

    publisher.set_string(&writer, "color", "BLUE")?;
    publisher.set_number(&writer, "x", 10.0)?;
    publisher.set_boolean(&writer, "visible", true)?;
    publisher.write(&writer, None)?;

    subscriber.take(&reader)?;
    assert_eq!(subscriber.sample_count(&reader)?, 1);
    assert!(subscriber.valid_data(&reader, 0)?);
    assert_eq!(subscriber.get_string(&reader, 0, "color")?, "BLUE");
    assert_eq!(subscriber.get_number(&reader, 0, "x")?, 10.0);
    assert!(subscriber.get_boolean(&reader, 0, "visible")?);

    let sample: Value = serde_json::from_str(&subscriber.get_json(&reader, 0)?)?;
    assert_eq!(
        sample,
        json!({
            "color": "BLUE",
            "x": 10,
            "y": 0,
            "shapesize": 0,
            "fillKind": 0,
            "visible": true
        })
    );

    subscriber.take(&reader)?;
    assert_eq!(subscriber.sample_count(&reader)?, 0);
    Ok(())
}

#[test]
fn test_read_keeps_samples() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let writer = publisher.writer("MyPublisher::MySquareWriter")?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;

    for x in 1..=3 {
        publisher.set_number(&writer, "x", f64::from(x))?;
        publisher.write(&writer, None)?;
    }

    subscriber.read(&reader)?;
    assert_eq!(subscriber.sample_count(&reader)?, 3);
    subscriber.read(&reader)?;
    assert_eq!(subscriber.sample_count(&reader)?, 3);
    assert_eq!(subscriber.get_number(&reader, 2, "x")?, 3.0);
    Ok(())
}

#[test]
fn test_keep_last_history() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let writer = publisher.writer("MyPublisher::MySquareWriter")?;
    let latest = subscriber.reader("MySubscriber::MyLatestSquareReader")?;

    for x in 1..=5 {
        publisher.set_number(&writer, "x", f64::from(x))?;
        publisher.write(&writer, None)?;
    }

    subscriber.take(&latest)?;
    assert_eq!(subscriber.sample_count(&latest)?, 2);
    assert_eq!(subscriber.get_number(&latest, 0, "x")?, 4.0);
    assert_eq!(subscriber.get_number(&latest, 1, "x")?, 5.0);
    Ok(())
}

#[test]
fn test_topics_are_separate() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let circles = publisher.writer("MyPublisher::MyCircleWriter")?;
    let squares = subscriber.reader("MySubscriber::MySquareReader")?;

    publisher.write(&circles, None)?;
    assert!(!subscriber.wait_reader(&squares, Timeout::Millis(0))?);
    subscriber.take(&squares)?;
    assert_eq!(subscriber.sample_count(&squares)?, 0);
    Ok(())
}

#[test]
fn test_dispose_is_invalid_data() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let writer = publisher.writer("MyPublisher::MySquareWriter")?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;

    publisher.set_string(&writer, "color", "RED")?;
    publisher.write(&writer, None)?;
    publisher.write(&writer, Some(&WriteParams::dispose()))?;

    subscriber.take(&reader)?;
    assert_eq!(subscriber.sample_count(&reader)?, 2);
    assert!(subscriber.valid_data(&reader, 0)?);
    assert!(!subscriber.valid_data(&reader, 1)?);
    // The key is still there.
    assert_eq!(subscriber.get_string(&reader, 1, "color")?, "RED");
    Ok(())
}

#[test]
fn test_set_json_and_clear() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let writer = publisher.writer("MyPublisher::MySquareWriter")?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;

    publisher.set_json(&writer, r#"{"color": "GREEN", "y": 7}"#)?;
    publisher.write(&writer, None)?;
    publisher.clear(&writer)?;
    publisher.write(&writer, None)?;

    subscriber.take(&reader)?;
    assert_eq!(subscriber.get_string(&reader, 0, "color")?, "GREEN");
    assert_eq!(subscriber.get_number(&reader, 0, "y")?, 7.0);
    assert_eq!(subscriber.get_string(&reader, 1, "color")?, "");
    assert_eq!(subscriber.get_number(&reader, 1, "y")?, 0.0);
    Ok(())
}

#[test]
fn test_bad_fields() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let writer = publisher.writer("MyPublisher::MySquareWriter")?;

    assert!(matches!(
        publisher.set_number(&writer, "z", 1.0),
        Err(Error::External(_))
    ));
    assert!(matches!(
        publisher.set_json(&writer, r#"{"z": 1}"#),
        Err(Error::External(_))
    ));
    assert!(matches!(
        publisher.set_json(&writer, "[1, 2]"),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        publisher.set_json(&writer, "{"),
        Err(Error::Json(_))
    ));
    Ok(())
}

#[test]
fn test_sample_index_out_of_range() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;
    subscriber.take(&reader)?;

    assert!(matches!(
        subscriber.get_number(&reader, 0, "x"),
        Err(Error::OutOfRange { name: "index", value: 0 })
    ));
    assert!(matches!(
        subscriber.valid_data(&reader, 3),
        Err(Error::OutOfRange { name: "index", value: 3 })
    ));
    Ok(())
}

#[test]
fn test_wait_returns_immediately_without_data() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let _reader = subscriber.reader("MySubscriber::MySquareReader")?;

    let start = Instant::now();
    assert!(!subscriber.wait(Timeout::Millis(0))?);
    assert!(start.elapsed() < Duration::from_secs(1));
    Ok(())
}

#[test]
fn test_wait_blocks_until_write() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;

    let config = shapes.participant(PUB_PARTICIPANT)?;
    let publisher = thread::spawn(move || -> connector_core::Result<()> {
        let session = LoopbackSession::open(&config)?;
        let writer = session.writer("MyPublisher::MySquareWriter")?;
        thread::sleep(Duration::from_millis(50));
        session.set_number(&writer, "x", 1.0)?;
        session.write(&writer, None)
    });

    assert!(subscriber.wait(Timeout::Infinite)?);
    assert!(subscriber.wait_reader(&reader, Timeout::Millis(0))?);
    publisher.join().expect("publisher thread panicked")?;

    subscriber.read(&reader)?;
    assert_eq!(subscriber.sample_count(&reader)?, 1);
    // Everything has been read now.
    assert!(!subscriber.wait(Timeout::Millis(0))?);
    Ok(())
}

#[test]
fn test_released_reader_is_not_waited_on() -> TestResult {
    let shapes = ShapeConfig::new()?;
    let publisher = LoopbackSession::open(&shapes.participant(PUB_PARTICIPANT)?)?;
    let subscriber = LoopbackSession::open(&shapes.participant(SUB_PARTICIPANT)?)?;
    let writer = publisher.writer("MyPublisher::MySquareWriter")?;
    let reader = subscriber.reader("MySubscriber::MySquareReader")?;
    subscriber.release_reader(reader)?;

    publisher.write(&writer, None)?;
    assert!(!subscriber.wait(Timeout::Millis(0))?);
    Ok(())
}

#[test]
fn test_recursive_type_is_external_error() -> TestResult {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".xml").tempfile()?;
    file.write_all(
        br#"<dds>
    <types>
        <struct name="Node">
            <member name="l" type="nonBasic" nonBasicTypeName="Node"/>
            <member name="r" type="nonBasic" nonBasicTypeName="Node"/>
        </struct>
    </types>
    <domain_library name="D">
        <domain name="Dom" domain_id="250">
            <topic name="Nodes" register_type_ref="Node"/>
        </domain>
    </domain_library>
    <domain_participant_library name="L">
        <domain_participant name="P" domain_ref="D::Dom">
            <publisher name="Pub">
                <data_writer name="W" topic_ref="Nodes"/>
            </publisher>
        </domain_participant>
    </domain_participant_library>
</dds>"#,
    )?;
    file.flush()?;

    let config = ConnectorConfig::new("L::P", file.path())?;
    match LoopbackSession::open(&config) {
        Err(Error::External(msg)) => assert!(msg.contains("recursive type")),
        _ => panic!("expected an external error"),
    }
    Ok(())
}
