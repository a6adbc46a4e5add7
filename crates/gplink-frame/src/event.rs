//! Decoded events and the sinks that receive them.

use std::fmt;
use std::sync::mpsc::Sender;

use bytes::Buf;
use tracing::debug;

use crate::codec::Ignored;
use crate::command::Command;
use crate::opcode::{ExternalModule, SizeTag};

/// Discriminant of [`Event`], one per [`EventSink`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Data8,
    Data16,
    Numeric,
    ColdPaletteModuleData,
    RgbCapModuleData,
}

impl EventKind {
    /// Short snake_case name, as used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data8 => "data8",
            Self::Data16 => "data16",
            Self::Numeric => "numeric",
            Self::ColdPaletteModuleData => "cold_palette_module_data",
            Self::RgbCapModuleData => "rgb_cap_module_data",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed result of decoding one device-to-host frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// 8-bit samples from `channel`.
    Data8 { channel: u8, values: Vec<u8> },
    /// 16-bit samples from `channel`.
    Data16 { channel: u8, values: Vec<u16> },
    /// 32-bit samples from `channel`, widened to `f64`.
    Numeric { channel: u8, values: Vec<f64> },
    /// Module-id data reported by the cold palette module.
    ColdPaletteModuleData(Vec<u8>),
    /// Module-id data reported by the RGB capture module.
    RgbCapModuleData(Vec<u8>),
}

impl Event {
    /// Build the event a received command maps to.
    ///
    /// Commands without a receive-side event, unknown modules and the
    /// reserved size tag map to the matching [`Ignored`] reason.
    pub fn from_command(command: Command) -> Result<Self, Ignored> {
        match command {
            Command::Data {
                channel,
                flags,
                data,
            } => {
                let tag = SizeTag::from_flags(flags).ok_or(Ignored::ReservedSizeTag)?;
                Ok(data_event(channel, tag, &data))
            }
            Command::GetModuleIdData { module, data, .. } => {
                match ExternalModule::from_u8(module) {
                    Some(ExternalModule::ColdPalette) => Ok(Self::ColdPaletteModuleData(data)),
                    Some(ExternalModule::RgbCap) => Ok(Self::RgbCapModuleData(data)),
                    None => Err(Ignored::UnknownModule(module)),
                }
            }
            other => Err(Ignored::NoEventPath(other.opcode())),
        }
    }

    /// Which kind of event this is.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Data8 { .. } => EventKind::Data8,
            Self::Data16 { .. } => EventKind::Data16,
            Self::Numeric { .. } => EventKind::Numeric,
            Self::ColdPaletteModuleData(_) => EventKind::ColdPaletteModuleData,
            Self::RgbCapModuleData(_) => EventKind::RgbCapModuleData,
        }
    }

    /// Source channel of sample events.
    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::Data8 { channel, .. }
            | Self::Data16 { channel, .. }
            | Self::Numeric { channel, .. } => Some(*channel),
            Self::ColdPaletteModuleData(_) | Self::RgbCapModuleData(_) => None,
        }
    }

    /// Number of elements carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Data8 { values, .. } => values.len(),
            Self::Data16 { values, .. } => values.len(),
            Self::Numeric { values, .. } => values.len(),
            Self::ColdPaletteModuleData(data) | Self::RgbCapModuleData(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// `data.len()` is the byte count; a trailing partial element is dropped.
fn data_event(channel: u8, tag: SizeTag, data: &[u8]) -> Event {
    let elements = data.len() / tag.element_size();
    let mut src = data;
    match tag {
        SizeTag::Bits8 => Event::Data8 {
            channel,
            values: data.to_vec(),
        },
        SizeTag::Bits16 => Event::Data16 {
            channel,
            values: (0..elements).map(|_| src.get_u16_le()).collect(),
        },
        SizeTag::Bits32 => Event::Numeric {
            channel,
            values: (0..elements).map(|_| f64::from(src.get_u32_le())).collect(),
        },
    }
}

/// Receives decoded events, one method per event kind.
///
/// Every method defaults to dropping the event, so a sink only implements
/// the kinds it cares about.
pub trait EventSink {
    fn data8(&mut self, _channel: u8, _values: Vec<u8>) {}

    fn data16(&mut self, _channel: u8, _values: Vec<u16>) {}

    fn numeric(&mut self, _channel: u8, _values: Vec<f64>) {}

    fn cold_palette_module_data(&mut self, _data: Vec<u8>) {}

    fn rgb_cap_module_data(&mut self, _data: Vec<u8>) {}
}

/// Route an event to exactly one sink method.
pub fn dispatch<S: EventSink + ?Sized>(event: Event, sink: &mut S) {
    match event {
        Event::Data8 { channel, values } => sink.data8(channel, values),
        Event::Data16 { channel, values } => sink.data16(channel, values),
        Event::Numeric { channel, values } => sink.numeric(channel, values),
        Event::ColdPaletteModuleData(data) => sink.cold_palette_module_data(data),
        Event::RgbCapModuleData(data) => sink.rgb_cap_module_data(data),
    }
}

/// Records every event in arrival order.
impl EventSink for Vec<Event> {
    fn data8(&mut self, channel: u8, values: Vec<u8>) {
        self.push(Event::Data8 { channel, values });
    }

    fn data16(&mut self, channel: u8, values: Vec<u16>) {
        self.push(Event::Data16 { channel, values });
    }

    fn numeric(&mut self, channel: u8, values: Vec<f64>) {
        self.push(Event::Numeric { channel, values });
    }

    fn cold_palette_module_data(&mut self, data: Vec<u8>) {
        self.push(Event::ColdPaletteModuleData(data));
    }

    fn rgb_cap_module_data(&mut self, data: Vec<u8>) {
        self.push(Event::RgbCapModuleData(data));
    }
}

/// Forwards events to another thread. Events sent after the receiver is
/// dropped are discarded.
impl EventSink for Sender<Event> {
    fn data8(&mut self, channel: u8, values: Vec<u8>) {
        forward(self, Event::Data8 { channel, values });
    }

    fn data16(&mut self, channel: u8, values: Vec<u16>) {
        forward(self, Event::Data16 { channel, values });
    }

    fn numeric(&mut self, channel: u8, values: Vec<f64>) {
        forward(self, Event::Numeric { channel, values });
    }

    fn cold_palette_module_data(&mut self, data: Vec<u8>) {
        forward(self, Event::ColdPaletteModuleData(data));
    }

    fn rgb_cap_module_data(&mut self, data: Vec<u8>) {
        forward(self, Event::RgbCapModuleData(data));
    }
}

fn forward(tx: &Sender<Event>, event: Event) {
    let kind = event.kind();
    if tx.send(event).is_err() {
        debug!(kind = kind.as_str(), "event receiver dropped");
    }
}
