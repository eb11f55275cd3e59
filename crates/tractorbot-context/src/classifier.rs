use tracing::{debug, info};

use crate::fuzz::partial_ratio;
use crate::table::{ContextInfo, ContextTable, GENERAL, WILDCARD};

/// Fuzzy scores must be strictly above this to select a context
const FUZZY_THRESHOLD: u8 = 75;

/// Pick the context a message belongs to.
///
/// A trigger contained in the lowercased message wins outright, first in
/// table order. Otherwise the single best fuzzy trigger score above the
/// threshold decides, earlier contexts winning ties. Anything else is
/// `General`.
pub fn classify<'a>(table: &'a ContextTable, message: &str) -> &'a ContextInfo {
    if message.is_empty() {
        return table.general();
    }
    
    let message = message.to_lowercase();
    let triggers = || {
        table.iter().flat_map(|ctx| {
            ctx.triggers
                .iter()
                .filter(|t| t.as_str() != WILDCARD)
                .map(move |t| (ctx, t.to_lowercase()))
        })
    };
    
    if let Some((ctx, trigger)) = triggers().find(|(_, t)| message.contains(t.as_str())) {
        info!(context = %ctx.name, trigger = %trigger, "Direct context match found");
        return ctx;
    }
    
    let mut best: (&str, u8) = (GENERAL, 0);
    for (ctx, trigger) in triggers() {
        let score = partial_ratio(&message, &trigger);
        if score > best.1 && score > FUZZY_THRESHOLD {
            debug!(context = %ctx.name, trigger = %trigger, score, "Fuzzy candidate");
            best = (ctx.name.as_str(), score);
        }
    }
    
    info!(context = best.0, score = best.1, "Fuzzy context match found");
    table.get(best.0).unwrap_or_else(|| table.general())
}
