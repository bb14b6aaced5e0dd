//! Describe command handler

use crate::cli::DescribeArgs;
use crate::error::Result;
use crate::output::OutputWriter;
use schemadeck_core::registry;
use tracing::instrument;

/// Handle the describe command
///
/// This is a static view of the schema and never validates anything.
#[instrument(skip(args, output), fields(schema = %args.schema))]
pub fn handle_describe(args: DescribeArgs, output: &mut OutputWriter) -> Result<()> {
    let entry = registry::entry(&args.schema)?;

    if args.json_schema {
        return output.data(&entry.schema.json_schema());
    }

    output.description(&entry.schema.describe())?;
    output.section("Why it matters")?;
    output.info(&entry.explanation)
}
