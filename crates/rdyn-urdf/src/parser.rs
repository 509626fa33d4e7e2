//! URDF XML parser.
//!
//! Event-driven parsing of URDF XML into the intermediate representation.
//! Errors carry the 1-based source line they were detected on.

use nalgebra::Vector3;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, UrdfError};
use crate::types::{
    UrdfDynamics, UrdfInertia, UrdfInertial, UrdfJoint, UrdfJointKind, UrdfLimit, UrdfLink,
    UrdfOrigin, UrdfRobot,
};

/// Parse a URDF document from a string.
pub fn parse_urdf_str(xml: &str) -> Result<UrdfRobot> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut robot: Option<UrdfRobot> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"robot" => {
                robot = Some(parse_robot(&mut reader, e)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(&reader, e)),
        }
        buf.clear();
    }

    robot.ok_or_else(|| UrdfError::parse(1, "no <robot> element in document"))
}

/// Parse a URDF document from raw bytes (must be valid UTF-8).
pub(crate) fn parse_urdf_bytes(bytes: &[u8]) -> Result<UrdfRobot> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| UrdfError::parse(1, format!("document is not valid UTF-8: {e}")))?;
    parse_urdf_str(xml)
}

fn parse_robot(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<UrdfRobot> {
    let name = require_attr(reader, start, "name")?;
    let mut robot = UrdfRobot::new(name);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem = e.name().as_ref().to_vec();
                match elem.as_slice() {
                    b"link" => robot.links.push(parse_link(reader, e)?),
                    b"joint" => robot.joints.push(parse_joint(reader, e)?),
                    // material, gazebo, transmission, ... are not our concern
                    _ => skip_element(reader, &elem)?,
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"link" => {
                    // Self-closing link: just a name
                    robot.links.push(UrdfLink::new(require_attr(reader, e, "name")?));
                }
                b"joint" => {
                    return Err(UrdfError::parse(
                        current_line(reader),
                        "joint must declare <parent> and <child>",
                    ));
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"robot" => break,
            Ok(Event::Eof) => {
                return Err(UrdfError::parse(current_line(reader), "unexpected EOF in <robot>"))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(reader, e)),
        }
        buf.clear();
    }

    tracing::debug!(
        links = robot.links.len(),
        joints = robot.joints.len(),
        "parsed robot '{}'",
        robot.name
    );
    Ok(robot)
}

fn parse_link(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<UrdfLink> {
    let mut link = UrdfLink::new(require_attr(reader, start, "name")?);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem = e.name().as_ref().to_vec();
                match elem.as_slice() {
                    b"inertial" => link.inertial = Some(parse_inertial(reader)?),
                    // visual and collision belong to the viewer, not the kernel
                    _ => skip_element(reader, &elem)?,
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"link" => break,
            Ok(Event::Eof) => {
                return Err(UrdfError::parse(current_line(reader), "unexpected EOF in <link>"))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(reader, e)),
        }
        buf.clear();
    }

    Ok(link)
}

fn parse_inertial(reader: &mut Reader<&[u8]>) -> Result<UrdfInertial> {
    let mut inertial = UrdfInertial::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"origin" => inertial.origin = parse_origin(reader, e)?,
                b"mass" => {
                    inertial.mass = require_f64_attr(reader, e, "value")?;
                }
                b"inertia" => inertial.inertia = parse_inertia_element(reader, e)?,
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"inertial" => break,
            Ok(Event::Eof) => {
                return Err(UrdfError::parse(
                    current_line(reader),
                    "unexpected EOF in <inertial>",
                ))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(reader, e)),
        }
        buf.clear();
    }

    Ok(inertial)
}

fn parse_origin(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<UrdfOrigin> {
    let xyz = match optional_attr(e, "xyz") {
        Some(s) => parse_vector3(reader, &s)?,
        None => Vector3::zeros(),
    };
    let rpy = match optional_attr(e, "rpy") {
        Some(s) => parse_vector3(reader, &s)?,
        None => Vector3::zeros(),
    };
    Ok(UrdfOrigin::new(xyz, rpy))
}

fn parse_inertia_element(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<UrdfInertia> {
    Ok(UrdfInertia {
        ixx: optional_f64_attr(reader, e, "ixx")?.unwrap_or(0.0),
        ixy: optional_f64_attr(reader, e, "ixy")?.unwrap_or(0.0),
        ixz: optional_f64_attr(reader, e, "ixz")?.unwrap_or(0.0),
        iyy: optional_f64_attr(reader, e, "iyy")?.unwrap_or(0.0),
        iyz: optional_f64_attr(reader, e, "iyz")?.unwrap_or(0.0),
        izz: optional_f64_attr(reader, e, "izz")?.unwrap_or(0.0),
    })
}

fn parse_joint(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<UrdfJoint> {
    let name = require_attr(reader, start, "name")?;
    let kind_str = require_attr(reader, start, "type")?;
    let kind = UrdfJointKind::parse(&kind_str).ok_or(UrdfError::UnsupportedJointType {
        name: name.clone(),
        kind: kind_str,
    })?;

    let mut parent: Option<String> = None;
    let mut child: Option<String> = None;
    let mut origin = UrdfOrigin::default();
    let mut axis = Vector3::x();
    let mut limit: Option<UrdfLimit> = None;
    let mut dynamics: Option<UrdfDynamics> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"parent" => parent = Some(require_attr(reader, e, "link")?),
                b"child" => child = Some(require_attr(reader, e, "link")?),
                b"origin" => origin = parse_origin(reader, e)?,
                b"axis" => {
                    if let Some(xyz) = optional_attr(e, "xyz") {
                        axis = parse_vector3(reader, &xyz)?;
                    }
                }
                b"limit" => {
                    limit = Some(UrdfLimit {
                        lower: optional_f64_attr(reader, e, "lower")?.unwrap_or(0.0),
                        upper: optional_f64_attr(reader, e, "upper")?.unwrap_or(0.0),
                        effort: optional_f64_attr(reader, e, "effort")?.unwrap_or(0.0),
                        velocity: optional_f64_attr(reader, e, "velocity")?.unwrap_or(0.0),
                    });
                }
                b"dynamics" => {
                    dynamics = Some(UrdfDynamics {
                        damping: optional_f64_attr(reader, e, "damping")?.unwrap_or(0.0),
                        friction: optional_f64_attr(reader, e, "friction")?.unwrap_or(0.0),
                    });
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"joint" => break,
            Ok(Event::Eof) => {
                return Err(UrdfError::parse(current_line(reader), "unexpected EOF in <joint>"))
            }
            Ok(_) => {}
            Err(e) => return Err(xml_error(reader, e)),
        }
        buf.clear();
    }

    let parent = parent.ok_or_else(|| {
        UrdfError::parse(current_line(reader), format!("joint '{name}' has no <parent>"))
    })?;
    let child = child.ok_or_else(|| {
        UrdfError::parse(current_line(reader), format!("joint '{name}' has no <child>"))
    })?;

    let mut joint = UrdfJoint::new(name, kind, parent, child)
        .with_origin(origin)
        .with_axis(axis);
    if let Some(l) = limit {
        joint = joint.with_limit(l);
    }
    joint.dynamics = dynamics;

    Ok(joint)
}

// ============================================================================
// Helper functions
// ============================================================================

/// 1-based line of the reader's current position in the source document.
fn current_line(reader: &Reader<&[u8]>) -> usize {
    let src: &[u8] = reader.get_ref();
    let pos = usize::try_from(reader.buffer_position()).unwrap_or(src.len());
    let pos = pos.min(src.len());
    src[..pos].iter().filter(|&&b| b == b'\n').count() + 1
}

fn xml_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> UrdfError {
    UrdfError::parse(current_line(reader), e.to_string())
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn require_attr(reader: &Reader<&[u8]>, e: &BytesStart, name: &str) -> Result<String> {
    optional_attr(e, name).ok_or_else(|| {
        UrdfError::parse(
            current_line(reader),
            format!("missing attribute '{name}' on <{}>", element_name(e)),
        )
    })
}

fn optional_attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

fn require_f64_attr(reader: &Reader<&[u8]>, e: &BytesStart, name: &str) -> Result<f64> {
    let s = require_attr(reader, e, name)?;
    parse_f64(reader, e, name, &s)
}

fn optional_f64_attr(reader: &Reader<&[u8]>, e: &BytesStart, name: &str) -> Result<Option<f64>> {
    match optional_attr(e, name) {
        Some(s) => parse_f64(reader, e, name, &s).map(Some),
        None => Ok(None),
    }
}

fn parse_f64(reader: &Reader<&[u8]>, e: &BytesStart, name: &str, s: &str) -> Result<f64> {
    s.trim().parse().map_err(|_| {
        UrdfError::parse(
            current_line(reader),
            format!("attribute '{name}' on <{}> is not a number: '{s}'", element_name(e)),
        )
    })
}

fn parse_vector3(reader: &Reader<&[u8]>, s: &str) -> Result<Vector3<f64>> {
    let parts: std::result::Result<Vec<f64>, _> =
        s.split_whitespace().map(str::parse::<f64>).collect();
    let parts = parts
        .map_err(|_| UrdfError::parse(current_line(reader), format!("invalid vector: '{s}'")))?;
    if parts.len() != 3 {
        return Err(UrdfError::parse(
            current_line(reader),
            format!("expected 3 values, got {}: '{s}'", parts.len()),
        ));
    }
    Ok(Vector3::new(parts[0], parts[1], parts[2]))
}

fn skip_element(reader: &mut Reader<&[u8]>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => depth += 1,
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(reader, e)),
        }
        buf.clear();
    }

    Ok(())
}
