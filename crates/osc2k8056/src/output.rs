use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use k8056_frame::instruction::instruction_name;
use k8056_frame::Frame;
use serde::Serialize;

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
    operation: &'a str,
    address: u8,
    instruction: String,
    instruction_name: &'static str,
    value: u8,
    checksum: u8,
    bytes: [u8; 5],
    hex: String,
}

pub fn print_frame(frame: &Frame, operation: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                operation,
                address: frame.address(),
                instruction: instruction_char(frame.instruction()),
                instruction_name: instruction_name(frame.instruction()),
                value: frame.value(),
                checksum: frame.checksum(),
                bytes: *frame.as_bytes(),
                hex: frame.to_string(),
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
                .set_header(vec![
                    "OPERATION",
                    "ADDRESS",
                    "INSTRUCTION",
                    "VALUE",
                    "CHECKSUM",
                    "BYTES",
                ])
                .add_row(vec![
                    operation.to_string(),
                    frame.address().to_string(),
                    format!(
                        "{} ({})",
                        instruction_char(frame.instruction()),
                        instruction_name(frame.instruction())
                    ),
                    frame.value().to_string(),
                    format!("0x{:02x}", frame.checksum()),
                    frame.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "operation={} address={} instruction={} value={} checksum=0x{:02x} bytes={}",
                operation,
                frame.address(),
                instruction_char(frame.instruction()),
                frame.value(),
                frame.checksum(),
                frame
            );
        }
        OutputFormat::Raw => {
            print_raw(frame.as_ref());
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn instruction_char(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        char::from(byte).to_string()
    } else {
        format!("0x{byte:02x}")
    }
}
