//! Operator listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use rasterflow_core::{Operator, OperatorKind, ParamFlags, ParameterInfo, PortSpec};

#[derive(Args)]
pub struct OperatorsArgs {
    /// Show details for a specific operator
    #[arg(value_name = "OPERATOR")]
    operator: Option<OperatorKind>,
}

fn describe_ports(ports: &[PortSpec]) -> String {
    if ports.is_empty() {
        return "-".to_string();
    }
    ports
        .iter()
        .map(|p| {
            let optional = if p.required { "" } else { "?" };
            format!("{}{optional} ({})", p.name, p.kind)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn range_text(op: &dyn Operator, index: usize) -> String {
    let Some(desc) = op.param_info(index) else {
        return String::new();
    };
    if !desc.step_labels.is_empty() {
        return desc.step_labels.join(" / ");
    }
    let close = if desc.flags.contains(ParamFlags::WRAPS) { ")" } else { "]" };
    format!(
        "[{}, {}{close}",
        desc.format_value(desc.min),
        desc.format_value(desc.max)
    )
}

fn print_details(kind: OperatorKind) {
    let op = kind.create();
    let title = format!("{} ({})", op.name(), kind.id());
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
    println!();
    println!("{}", kind.description());
    println!();
    println!("Inputs:  {}", describe_ports(op.inputs()));
    println!("Outputs: {}", describe_ports(op.outputs()));
    println!();

    if op.param_count() == 0 {
        println!("No parameters.");
        return;
    }

    println!("Parameters:");
    println!();
    println!("  {:12}  {:14}  {:10}  {}", "Id", "Name", "Default", "Range");
    println!("  {:12}  {:14}  {:10}  {}", "--", "----", "-------", "-----");
    for i in 0..op.param_count() {
        if let Some(desc) = op.param_info(i) {
            println!(
                "  {:12}  {:14}  {:10}  {}",
                desc.string_id,
                desc.name,
                desc.format_value(desc.default),
                range_text(op.as_ref(), i)
            );
        }
    }
}

pub fn run(args: OperatorsArgs) -> anyhow::Result<()> {
    if let Some(kind) = args.operator {
        print_details(kind);
        return Ok(());
    }

    println!("Available Operators");
    println!("===================");
    println!();
    for &kind in OperatorKind::all() {
        println!("  {:22}  {}", kind.id(), kind.description());
    }
    println!();
    println!("Use 'rasterflow operators <OPERATOR>' for ports and parameters.");
    Ok(())
}
