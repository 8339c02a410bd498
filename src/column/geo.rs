/// Geo column types are wrappers around existing column types
/// - Point: Tuple(Float64, Float64)
/// - Ring: Array(Point)
/// - Polygon: Array(Ring)
/// - MultiPolygon: Array(Polygon)
///
/// These types use the existing ColumnTuple and ColumnArray
/// implementations with specific type constraints. No separate column
/// implementation is needed.
use crate::types::{
    Type,
    TypeCode,
};

/// Helper to create a Point type (Tuple(Float64, Float64))
pub fn point_type() -> Type {
    Type::Tuple {
        item_types: vec![
            Type::Simple(TypeCode::Float64),
            Type::Simple(TypeCode::Float64),
        ],
    }
}

/// Helper to create a Ring type (Array(Point))
pub fn ring_type() -> Type {
    Type::Array { item_type: Box::new(point_type()) }
}

/// Helper to create a Polygon type (Array(Ring))
pub fn polygon_type() -> Type {
    Type::Array { item_type: Box::new(ring_type()) }
}

/// Helper to create a MultiPolygon type (Array(Polygon))
pub fn multi_polygon_type() -> Type {
    Type::Array { item_type: Box::new(polygon_type()) }
}
