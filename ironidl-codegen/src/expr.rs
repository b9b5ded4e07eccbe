//! Constant expression evaluation.
//!
//! Array bounds and template bounds must reduce to integers drawn from a
//! closed set of IDL integer kinds. Anything else is an internal error,
//! never a silent zero.

use crate::error::CodegenError;
use ironidl_ast::{ExprValue, NodeId};

/// Reduces an integral constant expression.
///
/// `node` and `context` only feed the error report.
///
/// # Errors
/// Returns `CodegenError::UnexpectedExpression` if the value is not a
/// short, unsigned short, long, or unsigned long.
#[track_caller]
pub fn reduce(expr: &ExprValue, node: NodeId, context: &'static str) -> Result<i64, CodegenError> {
    match expr {
        ExprValue::Short(v) => Ok(i64::from(*v)),
        ExprValue::UnsignedShort(v) => Ok(i64::from(*v)),
        ExprValue::Long(v) => Ok(i64::from(*v)),
        ExprValue::UnsignedLong(v) => Ok(i64::from(*v)),
        other => Err(CodegenError::unexpected_expression(
            node,
            other.kind(),
            context,
        )),
    }
}

/// Reduces a bound that must be non-negative.
///
/// # Errors
/// Returns `CodegenError` if the expression kind is not integral or the
/// value is negative.
#[track_caller]
pub fn extent(expr: &ExprValue, node: NodeId, context: &'static str) -> Result<u64, CodegenError> {
    let value = reduce(expr, node, context)?;
    u64::try_from(value).map_err(|_| CodegenError::negative_bound(node, value, context))
}

/// Reduces every dimension of an array, outermost first.
///
/// # Errors
/// Returns `CodegenError` if any dimension does not reduce.
#[track_caller]
pub fn extents(dims: &[ExprValue], node: NodeId) -> Result<Vec<u64>, CodegenError> {
    dims.iter().map(|d| extent(d, node, "array bound")).collect()
}

/// Computes the number of elements of an array.
///
/// The count must fit the 32-bit size type of the wire protocol; a zero
/// extent gives a count of zero.
///
/// # Errors
/// Returns `CodegenError` if a dimension does not reduce or the product
/// overflows.
#[track_caller]
pub fn element_count(dims: &[ExprValue], node: NodeId) -> Result<u32, CodegenError> {
    let mut count: u32 = 1;
    for extent in extents(dims, node)? {
        let extent = u32::try_from(extent).map_err(|_| CodegenError::overflow(node))?;
        count = count
            .checked_mul(extent)
            .ok_or_else(|| CodegenError::overflow(node))?;
    }
    Ok(count)
}

/// Renders the Ada index range for a dimension of the given extent.
#[must_use]
pub fn index_range(extent: u64) -> String {
    // An extent of zero yields the null range `0 .. -1`.
    format!("0 .. {}", i128::from(extent) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironidl_ast::ExprKind;

    const NODE: NodeId = NodeId::new(7);

    #[test]
    fn test_reduce_integral_kinds() {
        assert_eq!(reduce(&ExprValue::Short(-3), NODE, "bound").unwrap(), -3);
        assert_eq!(
            reduce(&ExprValue::UnsignedShort(65535), NODE, "bound").unwrap(),
            65535
        );
        assert_eq!(reduce(&ExprValue::Long(12), NODE, "bound").unwrap(), 12);
        assert_eq!(
            reduce(&ExprValue::UnsignedLong(u32::MAX), NODE, "bound").unwrap(),
            i64::from(u32::MAX)
        );
    }

    #[test]
    fn test_reduce_rejects_other_kinds() {
        for expr in [
            ExprValue::Double(2.0),
            ExprValue::String("3".to_string()),
            ExprValue::LongLong(3),
            ExprValue::Boolean(true),
        ] {
            let kind = expr.kind();
            match reduce(&expr, NODE, "array bound") {
                Err(CodegenError::UnexpectedExpression {
                    node, kind: found, ..
                }) => {
                    assert_eq!(node, NODE);
                    assert_eq!(found, kind);
                }
                other => panic!("expected unexpected-expression error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_float_bound_is_not_zero() {
        let err = extent(&ExprValue::Float(0.0), NODE, "array bound").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnexpectedExpression {
                kind: ExprKind::Float,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_extent() {
        let err = extent(&ExprValue::Short(-1), NODE, "array bound").unwrap_err();
        assert!(matches!(err, CodegenError::NegativeBound { value: -1, .. }));
    }

    #[test]
    fn test_element_count() {
        let dims = [ExprValue::Long(3), ExprValue::UnsignedShort(4)];
        assert_eq!(element_count(&dims, NODE).unwrap(), 12);
    }

    #[test]
    fn test_element_count_degenerate() {
        assert_eq!(element_count(&[ExprValue::Long(0)], NODE).unwrap(), 0);
    }

    #[test]
    fn test_element_count_overflow() {
        let dims = [
            ExprValue::UnsignedLong(65536),
            ExprValue::UnsignedLong(65536),
        ];
        let err = element_count(&dims, NODE).unwrap_err();
        assert!(matches!(err, CodegenError::ElementCountOverflow { node, .. } if node == NODE));
    }

    #[test]
    fn test_index_range() {
        assert_eq!(index_range(5), "0 .. 4");
        assert_eq!(index_range(1), "0 .. 0");
        assert_eq!(index_range(0), "0 .. -1");
    }
}
