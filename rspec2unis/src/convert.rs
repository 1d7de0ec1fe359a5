//! The `convert` subcommand.
//!
//! 1. Validate the slice URN and output path
//! 2. Parse the manifest and pick the schema adapter for the requested version
//! 3. Convert, then wrap in an NMWG request (and SOAP) when asked
//! 4. Write the document to `--output` or stdout, the summary to stderr

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{debug, warn};
use xml_ns_core::{parse_file, write, XmlNode};

use crate::cli::{ConvertArgs, EnvelopeKind, SummaryFormat};
use crate::path_guard::ensure_output_not_same;
use rspec2unis::conversion_summary::{
    render as render_conversion_summary, summarize as summarize_conversion,
};
use rspec2unis::envelope::{build_message, soapify};
use rspec2unis::manifest::{convert_manifest, SLICE_URN_PREFIX};
use rspec2unis::schema::{default_schema_table, load_schema_table, SchemaTable, SchemaVersion};

pub fn run_convert(args: ConvertArgs) -> Result<()> {
    if !args.slice_urn.starts_with(SLICE_URN_PREFIX) {
        bail!(
            "invalid slice urn {:?}: expected prefix {SLICE_URN_PREFIX}",
            args.slice_urn
        );
    }

    if let Some(output) = &args.output {
        let mut inputs = vec![args.manifest.as_path()];
        if let Some(credential) = &args.credential {
            inputs.push(credential.as_path());
        }
        ensure_output_not_same(output, &inputs)?;
    }

    let manifest = parse_file(&args.manifest)
        .with_context(|| format!("failed to parse {}", args.manifest.display()))?;

    let version = SchemaVersion::from(args.version);
    let table = resolve_schema_table(args.schemas_file.as_deref());
    let Some(adapter) = table.adapter(version) else {
        bail!("schema table has no entry for RSpec version {version}");
    };

    let topology = convert_manifest(&manifest, adapter.as_ref(), &args.slice_urn)
        .with_context(|| format!("failed to convert {}", args.manifest.display()))?;

    let document = wrap(&args, topology)?;
    let bytes = write(&document).context("failed to serialize topology")?;

    match &args.output {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("failed to write stdout")?;
            stdout.flush().context("failed to write stdout")?;
        }
    }

    let summary = summarize_conversion(&document);
    match args.summary {
        SummaryFormat::Text => eprintln!("{}", render_conversion_summary(summary).cyan()),
        SummaryFormat::Json => eprintln!("{}", serde_json::to_string(&summary)?),
    }
    Ok(())
}

/// Apply the requested NMWG and SOAP wrapping. A credential or `--soap`
/// without `--envelope` implies a replace request.
fn wrap(args: &ConvertArgs, topology: XmlNode) -> Result<XmlNode> {
    let envelope = match args.envelope {
        Some(kind) => Some(kind),
        None if args.credential.is_some() || args.soap => Some(EnvelopeKind::Replace),
        None => None,
    };
    let Some(kind) = envelope else {
        return Ok(topology);
    };

    let credential = args
        .credential
        .as_deref()
        .map(|path| {
            parse_file(path).with_context(|| format!("failed to parse credential {}", path.display()))
        })
        .transpose()?;

    let message = build_message(kind.into(), topology, credential);
    debug!(request = %message.attr_or_empty("type"), soap = args.soap, "wrapped topology");
    Ok(if args.soap { soapify(message) } else { message })
}

fn resolve_schema_table(path: Option<&Path>) -> SchemaTable {
    let Some(path) = path else {
        return default_schema_table();
    };

    match load_schema_table(path) {
        Ok(table) => {
            debug!(path = %path.display(), "loaded schema table");
            table
        }
        Err(err) => {
            warn!("{err}; using embedded schema table");
            default_schema_table()
        }
    }
}
