// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use std::{collections::BTreeMap, rc::Rc};

use crate::{
	buffer::{AttributeBuffer, IndexBuffer},
	device::{Device, SharedDevice, VertexArrayHandle},
	error::{ContractViolation, DeviceError, MeshError, Rejected},
	tables::MeshTables,
	types::{IndexType, PrimitiveKind},
};

#[cfg(test)]
mod test;

/// Slot count used by [`VertexArray::new`] and [`VertexArray::from_tables`]
pub const DEFAULT_MAX_ATTRIBUTE_SLOTS: u32 = 4;

/// Conventional attribute slots used by [`VertexArray::from_tables`]
pub mod slots {
	pub const POSITION: u32 = 0;
	pub const COLOR: u32 = 1;
	pub const NORMAL: u32 = 2;
	pub const TEXCOORD: u32 = 3;
}

struct SlotEntry<'s> {
	attribute: AttributeBuffer<'s>,
	enabled: bool,
}

/// Deleted on drop
struct DeviceVertexArray {
	device: Rc<dyn Device>,
	handle: VertexArrayHandle,
}

/// A position attribute, optional secondary attributes and an optional
/// index buffer, drawn together through one vertex array object.
///
/// Composition is only possible until [`create`](Self::create) succeeds.
/// Dropping the vertex array releases it and every buffer it owns.
pub struct VertexArray<'s> {
	max_slots: u32,
	vertex_count: usize,
	// slot 0 always holds the position attribute
	attributes: BTreeMap<u32, SlotEntry<'s>>,
	indices: Option<IndexBuffer<'s>>,
	// cached from `indices` when added
	index_format: Option<(IndexType, usize)>,
	device_array: Option<DeviceVertexArray>,
}

impl<'s> VertexArray<'s> {
	/// Vertex array with [`DEFAULT_MAX_ATTRIBUTE_SLOTS`] slots
	pub fn new(position: AttributeBuffer<'s>) -> Result<Self, ContractViolation> {
		Self::with_max_slots(DEFAULT_MAX_ATTRIBUTE_SLOTS, position)
	}

	/// `position` must use slot 0 and determines the vertex count.
	pub fn with_max_slots(
		max_slots: u32,
		position: AttributeBuffer<'s>,
	) -> Result<Self, ContractViolation> {
		if max_slots == 0 {
			return Err(ContractViolation::NoSlots)
		}
		if position.slot() != slots::POSITION {
			return Err(ContractViolation::PositionSlot(position.slot()))
		}
		position.validate()?;

		Ok(Self {
			max_slots,
			vertex_count: position.count(),
			attributes: BTreeMap::from([(slots::POSITION, SlotEntry {
				attribute: position,
				enabled: true,
			})]),
			indices: None,
			index_format: None,
			device_array: None,
		})
	}

	/// Build a vertex array from validated tables, using the conventional
	/// [`slots`] for each table.
	pub fn from_tables(tables: &'s MeshTables) -> Result<Self, ContractViolation> {
		tables.validate()?;

		let position = match tables.positions_3d.is_empty() {
			false => AttributeBuffer::from_vec3(slots::POSITION, &tables.positions_3d)?,
			true => AttributeBuffer::from_vec2(slots::POSITION, &tables.positions_2d)?,
		};
		let mut vertex_array = Self::with_max_slots(DEFAULT_MAX_ATTRIBUTE_SLOTS, position)?;

		if !tables.colors.is_empty() {
			vertex_array.add_attribute(AttributeBuffer::from_vec3(slots::COLOR, &tables.colors)?)?;
		}
		if !tables.normals.is_empty() {
			vertex_array
				.add_attribute(AttributeBuffer::from_vec3(slots::NORMAL, &tables.normals)?)?;
		}
		if !tables.texcoords.is_empty() {
			vertex_array
				.add_attribute(AttributeBuffer::from_vec2(slots::TEXCOORD, &tables.texcoords)?)?;
		}

		if !tables.triangles.is_empty() {
			vertex_array.add_index_buffer(IndexBuffer::from_triangles(&tables.triangles)?)?;
		} else if !tables.indices.is_empty() {
			vertex_array.add_index_buffer(IndexBuffer::new(&tables.indices)?)?;
		}

		Ok(vertex_array)
	}

	/// Add a secondary attribute. It starts out enabled.
	///
	/// A refused attribute is handed back in the error, still owning
	/// its device buffer if it was created.
	pub fn add_attribute(
		&mut self,
		attribute: AttributeBuffer<'s>,
	) -> Result<(), Rejected<AttributeBuffer<'s>>> {
		if let Err(violation) = self.check_attribute(&attribute) {
			return Err(Rejected {
				violation,
				descriptor: attribute,
			})
		}

		self.attributes.insert(attribute.slot(), SlotEntry {
			attribute,
			enabled: true,
		});
		Ok(())
	}

	fn check_attribute(&self, attribute: &AttributeBuffer<'s>) -> Result<(), ContractViolation> {
		if self.is_created() {
			return Err(ContractViolation::CompositionLocked)
		}

		let slot = attribute.slot();
		if slot == slots::POSITION {
			return Err(ContractViolation::ReservedSlot(slot))
		}
		if slot >= self.max_slots {
			return Err(ContractViolation::SlotOutOfRange {
				slot,
				max: self.max_slots,
			})
		}
		if self.attributes.contains_key(&slot) {
			return Err(ContractViolation::SlotOccupied(slot))
		}

		attribute.validate()?;
		if attribute.count() != self.vertex_count {
			return Err(ContractViolation::CountMismatch {
				slot,
				expected: self.vertex_count,
				actual: attribute.count(),
			})
		}

		Ok(())
	}

	/// Make this vertex array indexed. A refused index buffer is handed
	/// back in the error.
	pub fn add_index_buffer(
		&mut self,
		indices: IndexBuffer<'s>,
	) -> Result<(), Rejected<IndexBuffer<'s>>> {
		let checked = match (self.is_created(), self.indices.is_some()) {
			(true, _) => Err(ContractViolation::CompositionLocked),
			(false, true) => Err(ContractViolation::IndexBufferPresent),
			(false, false) => indices.validate(),
		};
		if let Err(violation) = checked {
			return Err(Rejected {
				violation,
				descriptor: indices,
			})
		}

		self.index_format = Some((indices.index_type(), indices.count()));
		self.indices = Some(indices);
		Ok(())
	}

	/// Choose whether a secondary attribute is used by following draws
	pub fn set_attribute_enabled(&mut self, slot: u32, enabled: bool) -> Result<(), ContractViolation> {
		if slot == slots::POSITION {
			return Err(ContractViolation::PositionLocked)
		}

		let entry = self.attributes.get_mut(&slot).ok_or(ContractViolation::SlotNotOwned(slot))?;
		entry.enabled = enabled;
		Ok(())
	}

	/// Create the vertex array object and every buffer it owns that
	/// has not been created yet.
	///
	/// Buffers created before they were added are attached without
	/// being uploaded again. Can only succeed once.
	///
	/// If the device fails partway, buffers created so far stay created
	/// and a later call attaches them.
	pub fn create<D: SharedDevice + ?Sized>(&mut self, device: &D) -> Result<(), MeshError> {
		if self.is_created() {
			return Err(ContractViolation::AlreadyCreated.into())
		}

		let device = device.shared();
		let supported = device.max_attribute_slots();
		if self.max_slots > supported {
			return Err(DeviceError::AttributeLimit {
				requested: self.max_slots,
				supported,
			}
			.into())
		}

		for entry in self.attributes.values() {
			entry.attribute.validate()?;
		}
		if let Some(indices) = &self.indices {
			indices.validate()?;
		}

		let handle = device.create_vertex_array()?;
		let device_array = DeviceVertexArray {
			device: device.clone(),
			handle,
		};

		device.bind_vertex_array(Some(handle));
		let result = self.create_children(&device);
		device.bind_vertex_array(None);
		result?;

		log::debug!(
			"created vertex array {:?} ({} vertices, {} attributes, {})",
			handle.0,
			self.vertex_count,
			self.attributes.len(),
			match self.index_format {
				Some((ty, count)) => format!("{count} {ty:?} indices"),
				None => "not indexed".to_owned(),
			}
		);

		self.device_array = Some(device_array);
		Ok(())
	}

	/// # SIDE EFFECTS
	/// * the vertex array being created must be bound
	fn create_children(&mut self, device: &Rc<dyn Device>) -> Result<(), MeshError> {
		for (&slot, entry) in self.attributes.iter_mut() {
			match entry.attribute.is_created() {
				true => entry.attribute.attach()?,
				false => entry.attribute.create(device)?,
			}

			if !entry.enabled {
				device.set_attribute_enabled(slot, false);
			}
		}

		if let Some(indices) = &mut self.indices {
			match indices.is_created() {
				true => indices.attach()?,
				false => indices.create(device)?,
			}
		}

		Ok(())
	}

	/// Draw the whole vertex array, indexed if it owns an index buffer
	pub fn draw(&self, kind: PrimitiveKind) -> Result<(), ContractViolation> {
		let device_array = self.device_array.as_ref().ok_or(ContractViolation::NotCreated)?;
		let device = &*device_array.device;

		device.bind_vertex_array(Some(device_array.handle));

		for (&slot, entry) in self.attributes.range(slots::POSITION + 1..) {
			device.set_attribute_enabled(slot, entry.enabled);
		}

		match self.index_format {
			Some((index_type, count)) => {
				log::trace!("draw {kind:?}: {count} {index_type:?} indices");
				device.draw_elements(kind, count, index_type);
			},
			None => {
				log::trace!("draw {kind:?}: {} vertices", self.vertex_count);
				device.draw_arrays(kind, self.vertex_count);
			},
		}

		Ok(())
	}

	/// Release the borrows of every source table, so the vertex array
	/// can outlive them. Only possible once created.
	pub fn into_owned(self) -> Result<VertexArray<'static>, ContractViolation> {
		if !self.is_created() {
			return Err(ContractViolation::NotCreated)
		}

		let attributes = self
			.attributes
			.into_iter()
			.map(|(slot, entry)| -> Result<_, ContractViolation> {
				Ok((slot, SlotEntry {
					attribute: entry.attribute.into_owned()?,
					enabled: entry.enabled,
				}))
			})
			.collect::<Result<BTreeMap<_, _>, _>>()?;

		Ok(VertexArray {
			max_slots: self.max_slots,
			vertex_count: self.vertex_count,
			attributes,
			indices: self.indices.map(IndexBuffer::into_owned).transpose()?,
			index_format: self.index_format,
			device_array: self.device_array,
		})
	}

	#[inline]
	pub fn is_created(&self) -> bool {
		self.device_array.is_some()
	}

	pub fn handle(&self) -> Option<VertexArrayHandle> {
		self.device_array.as_ref().map(|a| a.handle)
	}

	#[inline]
	pub fn max_slots(&self) -> u32 {
		self.max_slots
	}

	#[inline]
	pub fn vertex_count(&self) -> usize {
		self.vertex_count
	}

	#[inline]
	pub fn is_indexed(&self) -> bool {
		self.index_format.is_some()
	}

	pub fn index_count(&self) -> Option<usize> {
		self.index_format.map(|(_, count)| count)
	}

	pub fn index_type(&self) -> Option<IndexType> {
		self.index_format.map(|(ty, _)| ty)
	}

	/// Occupied slots in ascending order, position first
	pub fn attribute_slots(&self) -> impl Iterator<Item = u32> + '_ {
		self.attributes.keys().copied()
	}

	pub fn attribute(&self, slot: u32) -> Option<&AttributeBuffer<'s>> {
		self.attributes.get(&slot).map(|entry| &entry.attribute)
	}

	/// `None` if the slot is not occupied
	pub fn is_attribute_enabled(&self, slot: u32) -> Option<bool> {
		self.attributes.get(&slot).map(|entry| entry.enabled)
	}

	pub fn index_buffer(&self) -> Option<&IndexBuffer<'s>> {
		self.indices.as_ref()
	}
}

impl Drop for DeviceVertexArray {
	fn drop(&mut self) {
		log::debug!("deleting vertex array {:?}", self.handle.0);
		self.device.delete_vertex_array(self.handle);
	}
}
