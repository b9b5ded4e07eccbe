//! Shared test fixtures.

use ironidl_ast::{
    Ast, AstBuilder, ExprValue, NodeId, OperationDef, ParamDirection, PrimitiveType,
};

/// A small banking module:
///
/// ```idl
/// module Bank {
///   enum Kind { Credit, Debit };
///   struct Posting { long amount; Kind side; };
///   exception Overdrawn { long deficit; };
///   interface Account {
///     readonly attribute long balance;
///     attribute string owner;
///     void deposit (in long amount);
///     long withdraw (in long amount, out Posting receipt) raises (Overdrawn);
///     Posting last ();
///   };
/// };
/// ```
pub struct Fixture {
    pub ast: Ast,
    pub module: NodeId,
    pub kind: NodeId,
    pub entry: NodeId,
    pub overdrawn: NodeId,
    pub account: NodeId,
    pub long: NodeId,
    pub balance: NodeId,
    pub owner: NodeId,
    pub deposit: NodeId,
    pub withdraw: NodeId,
    pub last: NodeId,
}

pub fn bank() -> Fixture {
    let mut b = AstBuilder::new();
    let root = b.root();
    let long = b.primitive(PrimitiveType::Long);
    let module = b.module(root, "Bank").unwrap();
    let kind = b.enumeration(module, "Kind", &["Credit", "Debit"]).unwrap();
    let entry = b.structure(module, "Posting").unwrap();
    b.field(entry, "amount", long).unwrap();
    b.field(entry, "side", kind).unwrap();
    let overdrawn = b.exception(module, "Overdrawn").unwrap();
    b.field(overdrawn, "deficit", long).unwrap();

    let account = b.interface(module, "Account", Vec::new()).unwrap();
    let balance = b.attribute(account, "balance", long, true).unwrap();
    let text = b.string(account, None, false).unwrap();
    let owner = b.attribute(account, "owner", text, false).unwrap();
    let deposit = b
        .operation(account, "deposit", OperationDef::default())
        .unwrap();
    b.argument(deposit, "amount", ParamDirection::In, long).unwrap();
    let withdraw = b
        .operation(
            account,
            "withdraw",
            OperationDef {
                return_type: Some(long),
                oneway: false,
                raises: vec![overdrawn],
            },
        )
        .unwrap();
    b.argument(withdraw, "amount", ParamDirection::In, long).unwrap();
    b.argument(withdraw, "receipt", ParamDirection::Out, entry)
        .unwrap();
    let last = b
        .operation(
            account,
            "last",
            OperationDef {
                return_type: Some(entry),
                ..OperationDef::default()
            },
        )
        .unwrap();

    Fixture {
        ast: b.finish(),
        module,
        kind,
        entry,
        overdrawn,
        account,
        long,
        balance,
        owner,
        deposit,
        withdraw,
        last,
    }
}

/// Builds `module M { typedef <elem> Grid[dims...]; };` where the element
/// is `long` when `fixed` and an unbounded string otherwise.
///
/// Returns the tree, the module and the array.
pub fn array_fixture(fixed: bool, dims: &[i32]) -> (Ast, NodeId, NodeId) {
    let mut b = AstBuilder::new();
    let root = b.root();
    let module = b.module(root, "M").unwrap();
    let element = if fixed {
        b.primitive(PrimitiveType::Long)
    } else {
        b.string(module, None, false).unwrap()
    };
    let dims = dims.iter().map(|&d| ExprValue::Long(d)).collect();
    let array = b.array(module, dims, element).unwrap();
    b.typedef(module, "Grid", array).unwrap();
    (b.finish(), module, array)
}

/// Returns the text from the first `start` up to and including the next
/// `end`.
pub fn section(text: &str, start: &str, end: &str) -> String {
    let from = text
        .find(start)
        .unwrap_or_else(|| panic!("`{start}` not found in:\n{text}"));
    let len = text[from..]
        .find(end)
        .unwrap_or_else(|| panic!("`{end}` not found after `{start}`"));
    text[from..from + len + end.len()].to_string()
}

/// Returns the headers of the index loops in `text`, trimmed.
pub fn traversal_of(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("for I"))
        .map(str::to_string)
        .collect()
}
