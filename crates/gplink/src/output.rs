use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gplink_frame::{
    opcode_name, parse_command, Command, Decoded, Event, ExternalModule, SizeTag, WireFrame,
};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    opcode: u8,
    opcode_name: &'a str,
    size: usize,
    hex: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EventValues<'a> {
    Bytes(&'a [u8]),
    Words(&'a [u16]),
    Numbers(&'a [f64]),
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    opcode: u8,
    opcode_name: &'a str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<EventValues<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<Map<String, Value>>,
}

/// Print an encoded frame.
pub fn print_frame(frame: &WireFrame, format: OutputFormat) {
    let name = opcode_name(frame.header());
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                opcode: frame.header(),
                opcode_name: name,
                size: frame.as_bytes().len(),
                hex: frame.to_hex(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OPCODE", "SIZE", "FRAME"])
                .add_row(vec![
                    format!("{} ({})", frame.header(), name),
                    frame.as_bytes().len().to_string(),
                    frame.to_hex(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("opcode={} ({}) frame={}", frame.header(), name, frame.to_hex());
        }
        OutputFormat::Raw => print_raw(frame.as_bytes()),
    }
}

/// Print the outcome of decoding `frame`, with its structural parse.
pub fn print_decoded(
    index: Option<usize>,
    frame: &WireFrame,
    decoded: &Decoded,
    format: OutputFormat,
) {
    if let OutputFormat::Raw = format {
        print_raw(frame.as_bytes());
        return;
    }

    let command = parse_command(frame).ok();
    let out = decode_output(index, frame, decoded, command.as_ref());

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "OPCODE", "OUTCOME", "DETAIL", "FIELDS"])
                .add_row(vec![
                    index.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string()),
                    format!("{} ({})", out.opcode, out.opcode_name),
                    out.outcome.to_string(),
                    detail(&out),
                    out.command.as_ref().map(fields_line).unwrap_or_default(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let mut line = String::new();
            if let Some(index) = index {
                line.push_str(&format!("#{index} "));
            }
            line.push_str(&format!(
                "opcode={} ({}) {} {}",
                out.opcode,
                out.opcode_name,
                out.outcome,
                detail(&out)
            ));
            if let Some(fields) = &out.command {
                line.push_str(&format!(" [{}]", fields_line(fields)));
            }
            println!("{line}");
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn decode_output<'a>(
    index: Option<usize>,
    frame: &WireFrame,
    decoded: &'a Decoded,
    command: Option<&Command>,
) -> DecodeOutput<'a> {
    let mut out = DecodeOutput {
        index,
        opcode: frame.header(),
        opcode_name: opcode_name(frame.header()),
        outcome: "ignored",
        event: None,
        channel: None,
        values: None,
        reason: None,
        command: command.map(command_fields),
    };

    match decoded {
        Decoded::Event(event) => {
            out.outcome = "event";
            out.event = Some(event.kind().as_str());
            out.channel = event.channel();
            out.values = Some(event_values(event));
        }
        Decoded::Ignored(reason) => out.reason = Some(reason.to_string()),
    }
    out
}

fn event_values(event: &Event) -> EventValues<'_> {
    match event {
        Event::Data8 { values, .. } => EventValues::Bytes(values),
        Event::Data16 { values, .. } => EventValues::Words(values),
        Event::Numeric { values, .. } => EventValues::Numbers(values),
        Event::ColdPaletteModuleData(data) | Event::RgbCapModuleData(data) => {
            EventValues::Bytes(data)
        }
    }
}

fn detail(out: &DecodeOutput<'_>) -> String {
    if let Some(reason) = &out.reason {
        return reason.clone();
    }
    let mut detail = out.event.unwrap_or_default().to_string();
    if let Some(channel) = out.channel {
        detail.push_str(&format!(" channel={channel}"));
    }
    if let Some(values) = &out.values {
        let values = serde_json::to_string(values).unwrap_or_default();
        detail.push_str(&format!(" values={values}"));
    }
    detail
}

fn fields_line(fields: &Map<String, Value>) -> String {
    fields
        .iter()
        .map(|(name, value)| match value {
            Value::String(text) => format!("{name}={text}"),
            other => format!("{name}={other}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field-by-field view of a parsed command.
pub fn command_fields(command: &Command) -> Map<String, Value> {
    let mut fields = Map::new();
    match command {
        Command::Data {
            channel,
            flags,
            data,
        } => {
            fields.insert("channel".into(), Value::from(*channel));
            let tag = match SizeTag::from_flags(*flags) {
                Some(SizeTag::Bits8) => "8",
                Some(SizeTag::Bits16) => "16",
                Some(SizeTag::Bits32) => "32",
                None => "reserved",
            };
            fields.insert("size_tag".into(), Value::from(tag));
            fields.insert("count".into(), Value::from(data.len()));
            fields.insert("data".into(), Value::from(hex(data)));
        }
        Command::Stop { channel }
        | Command::StartClockwise { channel }
        | Command::StartCounterClockwise { channel } => {
            fields.insert("channel".into(), Value::from(*channel));
        }
        Command::StartAutoSwitcher {
            channel,
            off_time,
            on_time,
            count,
        } => {
            fields.insert("channel".into(), Value::from(*channel));
            fields.insert("off_time".into(), Value::from(*off_time));
            fields.insert("on_time".into(), Value::from(*on_time));
            fields.insert("count".into(), Value::from(*count));
        }
        Command::SetModuleIdData { module, data } => {
            insert_module(&mut fields, *module);
            fields.insert("len".into(), Value::from(data.len()));
            fields.insert("data".into(), Value::from(hex(data)));
        }
        Command::GetModuleIdData { module, len, data } => {
            insert_module(&mut fields, *module);
            fields.insert("len".into(), Value::from(*len));
            fields.insert("data".into(), Value::from(hex(data)));
        }
    }
    fields
}

fn insert_module(fields: &mut Map<String, Value>, module: u8) {
    fields.insert("module".into(), Value::from(module));
    let name = ExternalModule::from_u8(module)
        .map(ExternalModule::name)
        .unwrap_or("unknown");
    fields.insert("module_name".into(), Value::from(name));
}

fn hex(data: &[u8]) -> String {
    hex::encode(data)
}
