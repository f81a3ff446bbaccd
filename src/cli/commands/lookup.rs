use anyhow::Result;

use super::super::args::LookupArgs;
use super::{CommandResult, CommandSummary, LookupSummary, helper::finish};
use crate::core::ScanContext;

pub fn lookup(args: LookupArgs) -> Result<CommandResult> {
    let ctx = ScanContext::new(&args.common)?;
    let matches = ctx.lookup(&args.identifier)?;

    Ok(finish(
        CommandSummary::Lookup(LookupSummary {
            identifier: args.identifier,
            matches,
            json: args.json,
        }),
        Vec::new(),
        0,
        true,
    ))
}
