//! Generates the Ada units for a small banking module and prints them.
//!
//! Run with: `cargo run --example bank`
//! Set `RUST_LOG=debug` to trace the emission pass.

use ironidl::prelude::*;
use std::process::ExitCode;

/// Builds:
///
/// ```idl
/// module Bank {
///   enum Side { Credit, Debit };
///   typedef sequence<long, 16> History;
///   struct Posting { long amount; Side side; };
///   exception Overdrawn { long deficit; };
///   interface Account {
///     readonly attribute long balance;
///     void deposit (in long amount);
///     long withdraw (in long amount, out Posting receipt) raises (Overdrawn);
///   };
/// };
/// ```
fn build() -> Result<Ast, AstError> {
    let mut b = AstBuilder::new();
    let root = b.root();
    let long = b.primitive(PrimitiveType::Long);
    let bank = b.module(root, "Bank")?;
    let side = b.enumeration(bank, "Side", &["Credit", "Debit"])?;
    let history = b.sequence(bank, long, Some(ExprValue::Long(16)))?;
    b.typedef(bank, "History", history)?;
    let posting = b.structure(bank, "Posting")?;
    b.field(posting, "amount", long)?;
    b.field(posting, "side", side)?;
    let overdrawn = b.exception(bank, "Overdrawn")?;
    b.field(overdrawn, "deficit", long)?;

    let account = b.interface(bank, "Account", Vec::new())?;
    b.attribute(account, "balance", long, true)?;
    let deposit = b.operation(account, "deposit", OperationDef::default())?;
    b.argument(deposit, "amount", ParamDirection::In, long)?;
    let withdraw = b.operation(
        account,
        "withdraw",
        OperationDef {
            return_type: Some(long),
            oneway: false,
            raises: vec![overdrawn],
        },
    )?;
    b.argument(withdraw, "amount", ParamDirection::In, long)?;
    b.argument(withdraw, "receipt", ParamDirection::Out, posting)?;
    Ok(b.finish())
}

fn run() -> Result<(), CodegenError> {
    let ast = build()?;
    let config = GeneratorConfig::new().root_package("Bank_IDL_File");
    let code = ironidl::generate(&ast, &config)?;
    for artifact in code.artifacts() {
        println!("-- {}", artifact.file_name());
        println!("{}", artifact.text());
    }
    tracing::info!(files = code.artifacts().count(), "done");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[bank] generation failed: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
