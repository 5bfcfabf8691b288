#![cfg(feature = "loopback")]

pub mod common;

use common::{SQUARE_READER, SQUARE_WRITER, Shapes, TestResult};
use connector::{Entity, Error, WriteParams};
use serde::Serialize;

#[derive(Serialize)]
struct Shape<'a> {
    color: &'a str,
    x: i32,
    y: i32,
    shapesize: i32,
}

#[test]
fn test_write_after_output_dispose() -> TestResult {
    let shapes = Shapes::new()?;
    let connector = shapes.publisher()?;
    let mut output = connector.get_output(SQUARE_WRITER)?;
    output.write()?;
    output.dispose()?;

    assert!(output.is_disposed());
    assert!(matches!(output.write(), Err(Error::Disposed(Entity::Output))));
    assert!(matches!(output.clear(), Err(Error::Disposed(Entity::Output))));
    assert!(matches!(
        output.instance().set_string("color", "RED"),
        Err(Error::Disposed(Entity::Output))
    ));

    // The connector is unaffected.
    assert!(!connector.is_disposed());
    connector.get_output(SQUARE_WRITER)?.write()?;
    Ok(())
}

#[test]
fn test_double_dispose() -> TestResult {
    let shapes = Shapes::new()?;
    let connector = shapes.publisher()?;
    let mut output = connector.get_output(SQUARE_WRITER)?;
    output.dispose()?;
    output.dispose()?;
    assert!(output.is_disposed());
    assert_eq!(output.name(), SQUARE_WRITER);
    Ok(())
}

#[test]
fn test_instance_setters() -> TestResult {
    let shapes = Shapes::new()?;
    let publisher = shapes.publisher()?;
    let subscriber = shapes.subscriber()?;
    let output = publisher.get_output(SQUARE_WRITER)?;
    let input = subscriber.get_input(SQUARE_READER)?;

    let instance = output.instance();
    instance.set_string("color", "YELLOW")?;
    instance.set_number("x", 3.0)?;
    instance.set_boolean("visible", true)?;
    output.write()?;

    instance.set(&Shape {
        color: "PURPLE",
        x: 1,
        y: 2,
        shapesize: 30,
    })?;
    output.write()?;

    output.clear()?;
    output.write()?;

    input.take()?;
    let samples = input.samples();
    assert_eq!(samples.len()?, 3);

    assert_eq!(samples.get_string(0, "color")?, "YELLOW");
    assert_eq!(samples.get_number(0, "x")?, 3.0);
    assert!(samples.get_boolean(0, "visible")?);

    assert_eq!(samples.get_string(1, "color")?, "PURPLE");
    assert_eq!(samples.get_number(1, "shapesize")?, 30.0);
    // Members not in `Shape` keep their value.
    assert!(samples.get_boolean(1, "visible")?);

    assert_eq!(samples.get_string(2, "color")?, "");
    assert!(!samples.get_boolean(2, "visible")?);
    Ok(())
}

#[test]
fn test_bad_fields() -> TestResult {
    let shapes = Shapes::new()?;
    let connector = shapes.publisher()?;
    let output = connector.get_output(SQUARE_WRITER)?;
    let instance = output.instance();

    assert!(matches!(
        instance.set_number("", 1.0),
        Err(Error::InvalidArgument { name: "field_name", .. })
    ));
    assert!(matches!(
        instance.set_number("angle", 1.0),
        Err(Error::External(_))
    ));
    assert!(matches!(instance.set_json("{"), Err(Error::Json(_))));
    Ok(())
}

#[test]
fn test_write_with_dispose() -> TestResult {
    let shapes = Shapes::new()?;
    let publisher = shapes.publisher()?;
    let subscriber = shapes.subscriber()?;
    let output = publisher.get_output(SQUARE_WRITER)?;
    let input = subscriber.get_input(SQUARE_READER)?;

    output.instance().set_string("color", "BLUE")?;
    output.write()?;
    output.write_with(&WriteParams::dispose())?;
    output.write_with(&WriteParams::unregister().with_source_timestamp(1_000))?;

    input.take()?;
    let valid: Vec<bool> = input
        .samples()
        .iter()?
        .map(|sample| sample.valid_data())
        .collect::<connector::Result<_>>()?;
    assert_eq!(valid, [true, false, false]);
    Ok(())
}
