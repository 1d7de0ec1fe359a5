use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rspec2unis::envelope::UnisRequest;
use rspec2unis::schema::SchemaVersion;

#[derive(Parser, Debug)]
#[command(name = "rspec2unis")]
#[command(about = "Convert GENI RSpec manifests into UNIS topologies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Log conversion progress (overridden by RSPEC2UNIS_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Convert one manifest into a UNIS topology.
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// RSpec version the manifest was written against.
    #[arg(value_enum)]
    pub version: RspecVersion,
    /// Manifest file to convert.
    pub manifest: PathBuf,
    /// Slice URN, e.g. urn:publicid:IDN+emulab.net+slice+lamp.
    pub slice_urn: String,
    /// Output file path (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Wrap the topology in an NMWG topology store request.
    #[arg(long, value_enum)]
    pub envelope: Option<EnvelopeKind>,
    /// Slice credential to embed in the request (implies --envelope replace).
    #[arg(long)]
    pub credential: Option<PathBuf>,
    /// Wrap the request in a SOAP envelope (implies --envelope replace).
    #[arg(long)]
    pub soap: bool,
    /// Schema table overriding the embedded per-version field names.
    #[arg(long)]
    pub schemas_file: Option<PathBuf>,
    /// Format of the summary line written to stderr.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum RspecVersion {
    #[value(name = "0.1")]
    V0_1,
    #[value(name = "0.2")]
    V0_2,
    #[value(name = "2")]
    V2,
}

impl From<RspecVersion> for SchemaVersion {
    fn from(version: RspecVersion) -> Self {
        match version {
            RspecVersion::V0_1 => SchemaVersion::V0_1,
            RspecVersion::V0_2 => SchemaVersion::V0_2,
            RspecVersion::V2 => SchemaVersion::V2,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum EnvelopeKind {
    Replace,
    Add,
}

impl From<EnvelopeKind> for UnisRequest {
    fn from(kind: EnvelopeKind) -> Self {
        match kind {
            EnvelopeKind::Replace => UnisRequest::TsReplace,
            EnvelopeKind::Add => UnisRequest::TsAdd,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum SummaryFormat {
    Text,
    Json,
}
