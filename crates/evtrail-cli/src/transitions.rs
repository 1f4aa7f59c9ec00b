//! # Transitions Subcommand
//!
//! Lists the declared transitions of an entity type from the standard
//! registry, optionally restricted to one source state.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use evtrail_state::{FsmRegistry, TransitionDescriptor};

/// Arguments for `evtrail transitions`.
#[derive(Args, Debug)]
pub struct TransitionsArgs {
    /// Entity type, e.g. `shipment`.
    #[arg(long)]
    pub entity_type: String,

    /// Only show transitions leaving this state.
    #[arg(long)]
    pub state: Option<String>,
}

/// Execute the transitions subcommand.
pub fn run_transitions(args: &TransitionsArgs, out: &mut dyn Write) -> Result<u8> {
    let machine = FsmRegistry::standard().machine(&args.entity_type)?;

    let edges: Vec<&TransitionDescriptor> = match &args.state {
        Some(state) => {
            if !machine.contains_state(state) {
                anyhow::bail!(
                    "unknown state {state:?} for entity type {}; known: {}",
                    args.entity_type,
                    machine.states().join(", ")
                );
            }
            machine.get_transitions(state).iter().collect()
        }
        None => machine
            .states()
            .iter()
            .flat_map(|s| machine.get_transitions(s))
            .collect(),
    };

    if edges.is_empty() {
        writeln!(out, "(terminal: no outgoing transitions)")?;
    }
    for d in edges {
        let marker = if d.evidence_required { "  [evidence]" } else { "" };
        writeln!(out, "{} -> {}{marker}", d.from, d.to)?;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(entity_type: &str, state: Option<&str>) -> Result<String> {
        let args = TransitionsArgs {
            entity_type: entity_type.to_string(),
            state: state.map(str::to_string),
        };
        let mut out = Vec::new();
        run_transitions(&args, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_lists_all_shipment_edges() {
        let text = render("shipment", None).unwrap();
        assert_eq!(
            text,
            "planned -> packed\npacked -> dispatched\ndispatched -> arrived\narrived -> closed  [evidence]\n"
        );
    }

    #[test]
    fn test_terminal_state_has_no_edges() {
        assert!(render("lot", Some("certified")).unwrap().contains("terminal"));
    }

    #[test]
    fn test_unknown_inputs_are_errors() {
        assert!(render("pallet", None).is_err());
        assert!(render("lot", Some("shipped")).is_err());
    }
}
