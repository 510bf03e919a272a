// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use gl::types::GLenum;

/// Scalar type of an attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
	Float,
	Double,
}

/// Element type of an index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
	UnsignedByte,
	UnsignedShort,
	UnsignedInt,
}

/// Primitive kinds a vertex array may be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
	Points,
	Lines,
	LineStrip,
	LineLoop,
	Triangles,
}

impl ScalarType {
	#[inline]
	pub fn gl_type(&self) -> GLenum {
		match self {
			Self::Float => gl::FLOAT,
			Self::Double => gl::DOUBLE,
		}
	}

	#[inline]
	pub fn size(&self) -> usize {
		match self {
			Self::Float => std::mem::size_of::<f32>(),
			Self::Double => std::mem::size_of::<f64>(),
		}
	}
}

impl IndexType {
	#[inline]
	pub fn gl_type(&self) -> GLenum {
		match self {
			Self::UnsignedByte => gl::UNSIGNED_BYTE,
			Self::UnsignedShort => gl::UNSIGNED_SHORT,
			Self::UnsignedInt => gl::UNSIGNED_INT,
		}
	}

	#[inline]
	pub fn size(&self) -> usize {
		match self {
			Self::UnsignedByte => std::mem::size_of::<u8>(),
			Self::UnsignedShort => std::mem::size_of::<u16>(),
			Self::UnsignedInt => std::mem::size_of::<u32>(),
		}
	}
}

impl PrimitiveKind {
	#[inline]
	pub fn gl_mode(&self) -> GLenum {
		match self {
			Self::Points => gl::POINTS,
			Self::Lines => gl::LINES,
			Self::LineStrip => gl::LINE_STRIP,
			Self::LineLoop => gl::LINE_LOOP,
			Self::Triangles => gl::TRIANGLES,
		}
	}
}

/// Rust scalars that may back an attribute table.
pub trait AttributeScalar: bytemuck::Pod {
	const SCALAR_TYPE: ScalarType;
}

/// Rust integers that may back an index table.
pub trait IndexElement: bytemuck::Pod {
	const INDEX_TYPE: IndexType;
}

macro_rules! attribute_scalars {
	($($type:ident => $value:expr;)*) => {
		$(
			impl AttributeScalar for $type {
				const SCALAR_TYPE: ScalarType = $value;
			}
		)*
	};
}

macro_rules! index_elements {
	($($type:ident => $value:expr;)*) => {
		$(
			impl IndexElement for $type {
				const INDEX_TYPE: IndexType = $value;
			}
		)*
	};
}

attribute_scalars! {
	f32 => ScalarType::Float;
	f64 => ScalarType::Double;
}

index_elements! {
	u8 => IndexType::UnsignedByte;
	u16 => IndexType::UnsignedShort;
	u32 => IndexType::UnsignedInt;
}
