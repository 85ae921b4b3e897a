//! Physical MIDI ports through `midir`
//!
//! A logue device shows up as an input named `<prefix> ... KBD/KNOB` and an output named
//! `<prefix> ... SOUND`.

use ::midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use crossbeam::channel;
use tracing::{debug, info, warn};

use super::session::{FrameSink, Session, SessionConfig};
use crate::protocol::{DeviceFamily, Error, Result};

const CLIENT_NAME: &str = "logue-sysex";
const INPUT_SUFFIX: &str = "KBD/KNOB";
const OUTPUT_SUFFIX: &str = "SOUND";

/// Names of the MIDI ports visible to this host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortNames {
    /// Input port names
    pub inputs: Vec<String>,
    /// Output port names
    pub outputs: Vec<String>,
}

impl PortNames {
    /// Index of the device input port
    #[must_use]
    pub fn device_input(&self, family: DeviceFamily) -> Option<usize> {
        find_port(&self.inputs, family.port_prefix(), INPUT_SUFFIX)
    }

    /// Index of the device output port
    #[must_use]
    pub fn device_output(&self, family: DeviceFamily) -> Option<usize> {
        find_port(&self.outputs, family.port_prefix(), OUTPUT_SUFFIX)
    }
}

fn find_port(names: &[String], prefix: &str, suffix: &str) -> Option<usize> {
    names.iter().position(|name| name.contains(prefix) && name.contains(suffix))
}

/// List every input and output port
pub fn list_ports() -> Result<PortNames> {
    let input = MidiInput::new(CLIENT_NAME).map_err(port_error)?;
    let output = MidiOutput::new(CLIENT_NAME).map_err(port_error)?;

    Ok(PortNames {
        inputs: input
            .ports()
            .iter()
            .map(|port| input.port_name(port).unwrap_or_default())
            .collect(),
        outputs: output
            .ports()
            .iter()
            .map(|port| output.port_name(port).unwrap_or_default())
            .collect(),
    })
}

/// Output connection that also keeps the input connection alive
struct MidirSink {
    output: MidiOutputConnection,
    _input: MidiInputConnection<()>,
}

impl FrameSink for MidirSink {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.output.send(message).map_err(port_error)
    }
}

/// Open a session on the ports of the first connected `family` device
///
/// Without a matching output the session is opened anyway and every exchange fails with
/// [`Error::NoOutput`].
pub fn open_session(family: DeviceFamily, config: SessionConfig) -> Result<Session> {
    let mut input = MidiInput::new(CLIENT_NAME).map_err(port_error)?;
    // SysEx must reach the listener
    input.ignore(Ignore::TimeAndActiveSense);

    let input_ports = input.ports();
    let input_names: Vec<String> = input_ports
        .iter()
        .map(|port| input.port_name(port).unwrap_or_default())
        .collect();
    let input_index = find_port(&input_names, family.port_prefix(), INPUT_SUFFIX)
        .ok_or_else(|| Error::Port(format!("no {family} input port ({INPUT_SUFFIX}) found")))?;
    info!(port = %input_names[input_index], "opening input");

    let (inbound_tx, inbound_rx) = channel::unbounded();
    let input_conn = input
        .connect(
            &input_ports[input_index],
            "logue-sysex-in",
            move |_stamp, message, _| {
                if inbound_tx.send(message.to_vec()).is_err() {
                    debug!("inbound channel closed");
                }
            },
            (),
        )
        .map_err(port_error)?;

    let output = MidiOutput::new(CLIENT_NAME).map_err(port_error)?;
    let output_ports = output.ports();
    let output_names: Vec<String> = output_ports
        .iter()
        .map(|port| output.port_name(port).unwrap_or_default())
        .collect();

    let sink: Option<Box<dyn FrameSink>> =
        match find_port(&output_names, family.port_prefix(), OUTPUT_SUFFIX) {
            Some(index) => {
                info!(port = %output_names[index], "opening output");
                let output_conn = output
                    .connect(&output_ports[index], "logue-sysex-out")
                    .map_err(port_error)?;
                Some(Box::new(MidirSink {
                    output: output_conn,
                    _input: input_conn,
                }))
            }
            None => {
                warn!(%family, "no output port found");
                drop(input_conn);
                None
            }
        };

    Session::open(sink, inbound_rx, config)
}

fn port_error(err: impl std::fmt::Display) -> Error {
    Error::Port(err.to_string())
}
