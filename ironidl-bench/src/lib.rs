//! # IronIDL Bench
//!
//! Syntax tree builders for IronIDL emission benchmarks.

use ironidl_ast::{Ast, AstBuilder, AstError, ExprValue, OperationDef, ParamDirection, PrimitiveType};

/// Builds a module with `structs` records, each holding a long, a bounded
/// sequence of longs and a reference to the previous record.
///
/// # Errors
/// Returns `AstError` if the tree cannot be built.
pub fn record_chain(structs: usize) -> Result<Ast, AstError> {
    let mut b = AstBuilder::new();
    let root = b.root();
    let long = b.primitive(PrimitiveType::Long);
    let module = b.module(root, "Chain")?;
    let mut previous = None;
    for i in 0..structs {
        let s = b.structure(module, &format!("Link_{i}"))?;
        b.field(s, "value", long)?;
        let seq = b.sequence(s, long, Some(ExprValue::Long(32)))?;
        b.field(s, "history", seq)?;
        if let Some(prev) = previous {
            b.field(s, "prev", prev)?;
        }
        previous = Some(s);
    }
    Ok(b.finish())
}

/// Builds a typedef of a `dims` array of longs when `fixed`, or of
/// unbounded strings otherwise.
///
/// # Errors
/// Returns `AstError` if the tree cannot be built.
pub fn array_module(dims: &[i32], fixed: bool) -> Result<Ast, AstError> {
    let mut b = AstBuilder::new();
    let root = b.root();
    let module = b.module(root, "Grid")?;
    let element = if fixed {
        b.primitive(PrimitiveType::Long)
    } else {
        b.string(module, None, false)?
    };
    let dims = dims.iter().map(|&d| ExprValue::Long(d)).collect();
    let array = b.array(module, dims, element)?;
    b.typedef(module, "Cells", array)?;
    Ok(b.finish())
}

/// Builds an interface with `operations` operations, each taking one
/// `in` and one `out` long and returning a long.
///
/// # Errors
/// Returns `AstError` if the tree cannot be built.
pub fn wide_interface(operations: usize) -> Result<Ast, AstError> {
    let mut b = AstBuilder::new();
    let root = b.root();
    let long = b.primitive(PrimitiveType::Long);
    let module = b.module(root, "Service")?;
    let iface = b.interface(module, "Endpoint", Vec::new())?;
    for i in 0..operations {
        let op = b.operation(
            iface,
            &format!("call_{i}"),
            OperationDef {
                return_type: Some(long),
                ..OperationDef::default()
            },
        )?;
        b.argument(op, "input", ParamDirection::In, long)?;
        b.argument(op, "output", ParamDirection::Out, long)?;
    }
    Ok(b.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironidl_codegen::{GeneratorConfig, generate};

    #[test]
    fn test_builders_generate() {
        let config = GeneratorConfig::new();
        for ast in [
            record_chain(4).unwrap(),
            array_module(&[2, 3], true).unwrap(),
            array_module(&[2, 3], false).unwrap(),
            wide_interface(3).unwrap(),
        ] {
            let code = generate(&ast, &config).unwrap();
            assert!(code.artifacts().count() > 0);
        }
    }
}
