// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use glam::{Vec2, Vec3, Vec4};

use super::{table_size, BufferState, DeviceBuffer, Lifecycle};
use crate::{
	device::{BufferHandle, BufferTarget, SharedDevice},
	error::{ContractViolation, MeshError},
	types::{AttributeScalar, ScalarType},
};

/// One attribute table of a mesh, uploaded as its own buffer.
///
/// Tuples are tightly packed, one table per buffer (no interleaving).
/// The source is only borrowed until [`create`](Self::create) copies it.
pub struct AttributeBuffer<'s> {
	slot: u32,
	scalar_type: ScalarType,
	tuple_width: u32,
	count: usize,
	state: BufferState<'s>,
}

impl<'s> AttributeBuffer<'s> {
	/// Describe an attribute table from raw bytes
	///
	/// `source` must hold exactly `count * tuple_width` scalars of `scalar_type`.
	pub fn from_raw(
		slot: u32,
		scalar_type: ScalarType,
		tuple_width: u32,
		count: usize,
		source: &'s [u8],
	) -> Result<Self, ContractViolation> {
		let attribute = Self {
			slot,
			scalar_type,
			tuple_width,
			count,
			state: BufferState::Described { source },
		};

		attribute.validate()?;
		Ok(attribute)
	}

	/// Describe an attribute table from a flat slice of scalars,
	/// grouped into tuples of `tuple_width`.
	pub fn new<T: AttributeScalar>(
		slot: u32,
		tuple_width: u32,
		source: &'s [T],
	) -> Result<Self, ContractViolation> {
		check_tuple_width(tuple_width)?;

		if source.len() % tuple_width as usize != 0 {
			return Err(ContractViolation::RaggedTuples {
				len: source.len(),
				width: tuple_width,
			})
		}

		Self::from_raw(
			slot,
			T::SCALAR_TYPE,
			tuple_width,
			source.len() / tuple_width as usize,
			bytemuck::cast_slice(source),
		)
	}

	pub fn from_vec2(slot: u32, source: &'s [Vec2]) -> Result<Self, ContractViolation> {
		Self::from_raw(slot, ScalarType::Float, 2, source.len(), bytemuck::cast_slice(source))
	}

	pub fn from_vec3(slot: u32, source: &'s [Vec3]) -> Result<Self, ContractViolation> {
		Self::from_raw(slot, ScalarType::Float, 3, source.len(), bytemuck::cast_slice(source))
	}

	pub fn from_vec4(slot: u32, source: &'s [Vec4]) -> Result<Self, ContractViolation> {
		Self::from_raw(slot, ScalarType::Float, 4, source.len(), bytemuck::cast_slice(source))
	}

	/// Check the descriptor's metadata against its data
	pub fn validate(&self) -> Result<(), ContractViolation> {
		check_tuple_width(self.tuple_width)?;

		if self.count == 0 {
			return Err(ContractViolation::EmptyTable)
		}

		let expected = table_size(self.count, self.tuple_width as usize * self.scalar_type.size())?;
		let actual = self.state.bytes().len();
		if actual != expected {
			return Err(ContractViolation::SourceLength { expected, actual })
		}

		Ok(())
	}

	/// Copy the source, upload it and point this attribute's slot at it
	/// in the currently bound vertex array (enabling the slot).
	///
	/// Can only succeed once.
	pub fn create<D: SharedDevice + ?Sized>(&mut self, device: &D) -> Result<(), MeshError> {
		let source = match &self.state {
			BufferState::Described { source } => *source,
			BufferState::Created(_) => return Err(ContractViolation::AlreadyCreated.into()),
		};
		self.validate()?;

		let buffer = DeviceBuffer::upload(device.shared(), BufferTarget::Attribute, source)?;
		self.state = BufferState::Created(buffer);
		self.attach()?;

		Ok(())
	}

	/// Point this attribute's slot at the already created buffer,
	/// in the currently bound vertex array.
	pub(crate) fn attach(&self) -> Result<(), ContractViolation> {
		let buffer = self.state.buffer().ok_or(ContractViolation::NotCreated)?;
		let device = buffer.device();

		device.bind_buffer(BufferTarget::Attribute, buffer.handle());
		device.attribute_pointer(self.slot, self.tuple_width, self.scalar_type);
		device.set_attribute_enabled(self.slot, true);

		Ok(())
	}

	/// Release the borrow of the source table. The data has been copied
	/// once created, so the descriptor no longer depends on it.
	pub fn into_owned(self) -> Result<AttributeBuffer<'static>, ContractViolation> {
		Ok(AttributeBuffer {
			slot: self.slot,
			scalar_type: self.scalar_type,
			tuple_width: self.tuple_width,
			count: self.count,
			state: self.state.into_owned().ok_or(ContractViolation::NotCreated)?,
		})
	}

	#[inline]
	pub fn is_created(&self) -> bool {
		self.lifecycle() == Lifecycle::Created
	}

	#[inline]
	pub fn lifecycle(&self) -> Lifecycle {
		self.state.lifecycle()
	}

	/// Number of tuples
	#[inline]
	pub fn count(&self) -> usize {
		self.count
	}

	#[inline]
	pub fn slot(&self) -> u32 {
		self.slot
	}

	#[inline]
	pub fn scalar_type(&self) -> ScalarType {
		self.scalar_type
	}

	#[inline]
	pub fn tuple_width(&self) -> u32 {
		self.tuple_width
	}

	/// Size of the table in bytes. Matches the source length, which
	/// validation guarantees.
	#[inline]
	pub fn size_in_bytes(&self) -> usize {
		self.state.bytes().len()
	}

	/// The private copy, once created
	pub fn data(&self) -> Option<&[u8]> {
		self.state.buffer().map(|_| self.state.bytes())
	}

	pub fn handle(&self) -> Option<BufferHandle> {
		self.state.buffer().map(DeviceBuffer::handle)
	}
}

#[inline]
fn check_tuple_width(tuple_width: u32) -> Result<(), ContractViolation> {
	match tuple_width {
		2..=4 => Ok(()),
		_ => Err(ContractViolation::BadTupleWidth(tuple_width)),
	}
}
