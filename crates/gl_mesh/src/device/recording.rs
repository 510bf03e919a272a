// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! In-memory stand-in for a GL context.
//!
//! Tracks the same state GL keeps for vertex arrays (attribute sources,
//! enabled slots, element buffer) and records every draw together with
//! the slots that were enabled when it was issued.

use std::{
	cell::RefCell,
	collections::{BTreeMap, BTreeSet, HashMap},
	num::NonZeroU32,
};

use super::{BufferHandle, BufferTarget, Device, VertexArrayHandle};
use crate::{
	error::DeviceError,
	types::{IndexType, PrimitiveKind, ScalarType},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSource {
	pub buffer: BufferHandle,
	pub tuple_width: u32,
	pub scalar_type: ScalarType,
}

/// Vertex array state as GL would hold it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexArrayRecord {
	pub attributes: BTreeMap<u32, AttributeSource>,
	pub enabled: BTreeSet<u32>,
	pub element_buffer: Option<BufferHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
	pub vertex_array: Option<VertexArrayHandle>,
	pub kind: PrimitiveKind,
	pub count: usize,
	/// `Some` for indexed draws
	pub index_type: Option<IndexType>,
	pub enabled_slots: Vec<u32>,
}

#[derive(Debug)]
struct State {
	next_name: u32,
	allocations_left: Option<usize>,
	buffers: BTreeMap<BufferHandle, (BufferTarget, Vec<u8>)>,
	// `None` is the default vertex array (nothing bound)
	vertex_arrays: HashMap<Option<VertexArrayHandle>, VertexArrayRecord>,
	bound_vertex_array: Option<VertexArrayHandle>,
	bound_attribute_buffer: Option<BufferHandle>,
	deleted_buffers: Vec<BufferHandle>,
	deleted_vertex_arrays: Vec<VertexArrayHandle>,
	draws: Vec<DrawCall>,
}

#[derive(Debug)]
pub struct RecordingDevice {
	max_attribute_slots: u32,
	state: RefCell<State>,
}

impl Default for RecordingDevice {
	fn default() -> Self {
		Self::new()
	}
}

impl RecordingDevice {
	pub fn new() -> Self {
		Self::with_max_attribute_slots(16)
	}

	pub fn with_max_attribute_slots(max_attribute_slots: u32) -> Self {
		Self {
			max_attribute_slots,
			state: RefCell::new(State {
				next_name: 1,
				allocations_left: None,
				buffers: BTreeMap::new(),
				vertex_arrays: HashMap::from([(None, VertexArrayRecord::default())]),
				bound_vertex_array: None,
				bound_attribute_buffer: None,
				deleted_buffers: Vec::new(),
				deleted_vertex_arrays: Vec::new(),
				draws: Vec::new(),
			}),
		}
	}

	/// Let the next `count` allocations succeed, then fail with
	/// [`DeviceError::OutOfMemory`].
	pub fn fail_after(&self, count: usize) {
		self.state.borrow_mut().allocations_left = Some(count);
	}

	pub fn draws(&self) -> Vec<DrawCall> {
		self.state.borrow().draws.clone()
	}

	pub fn last_draw(&self) -> Option<DrawCall> {
		self.state.borrow().draws.last().cloned()
	}

	pub fn buffer_data(&self, buffer: BufferHandle) -> Option<Vec<u8>> {
		self.state.borrow().buffers.get(&buffer).map(|(_, data)| data.clone())
	}

	pub fn buffer_target(&self, buffer: BufferHandle) -> Option<BufferTarget> {
		self.state.borrow().buffers.get(&buffer).map(|(target, _)| *target)
	}

	pub fn live_buffers(&self) -> usize {
		self.state.borrow().buffers.len()
	}

	pub fn live_vertex_arrays(&self) -> usize {
		// minus the default vertex array
		self.state.borrow().vertex_arrays.len() - 1
	}

	pub fn deleted_buffers(&self) -> Vec<BufferHandle> {
		self.state.borrow().deleted_buffers.clone()
	}

	pub fn deleted_vertex_arrays(&self) -> Vec<VertexArrayHandle> {
		self.state.borrow().deleted_vertex_arrays.clone()
	}

	/// State of a vertex array, `None` for the default one
	pub fn vertex_array(&self, vertex_array: Option<VertexArrayHandle>) -> Option<VertexArrayRecord> {
		self.state.borrow().vertex_arrays.get(&vertex_array).cloned()
	}

	pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
		self.state.borrow().bound_vertex_array
	}
}

impl State {
	fn allocate_name(&mut self) -> Result<NonZeroU32, DeviceError> {
		match &mut self.allocations_left {
			Some(0) => return Err(DeviceError::OutOfMemory),
			Some(left) => *left -= 1,
			None => {},
		}

		let name = NonZeroU32::new(self.next_name).ok_or(DeviceError::CouldNotCreate("name"))?;
		self.next_name += 1;
		Ok(name)
	}

	fn bound_record(&mut self) -> &mut VertexArrayRecord {
		self.vertex_arrays.entry(self.bound_vertex_array).or_default()
	}
}

impl Device for RecordingDevice {
	fn create_buffer(
		&self,
		target: BufferTarget,
		data: &[u8],
	) -> Result<BufferHandle, DeviceError> {
		let mut state = self.state.borrow_mut();
		let buffer = BufferHandle(state.allocate_name()?);
		state.buffers.insert(buffer, (target, data.to_vec()));
		drop(state);

		self.bind_buffer(target, buffer);
		Ok(buffer)
	}

	fn delete_buffer(&self, buffer: BufferHandle) {
		let mut state = self.state.borrow_mut();
		state.buffers.remove(&buffer);
		state.deleted_buffers.push(buffer);

		if state.bound_attribute_buffer == Some(buffer) {
			state.bound_attribute_buffer = None;
		}
	}

	fn bind_buffer(&self, target: BufferTarget, buffer: BufferHandle) {
		let mut state = self.state.borrow_mut();
		match target {
			BufferTarget::Attribute => state.bound_attribute_buffer = Some(buffer),
			BufferTarget::Index => state.bound_record().element_buffer = Some(buffer),
		}
	}

	fn create_vertex_array(&self) -> Result<VertexArrayHandle, DeviceError> {
		let mut state = self.state.borrow_mut();
		let vertex_array = VertexArrayHandle(state.allocate_name()?);
		state.vertex_arrays.insert(Some(vertex_array), VertexArrayRecord::default());
		Ok(vertex_array)
	}

	fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
		let mut state = self.state.borrow_mut();
		state.vertex_arrays.remove(&Some(vertex_array));
		state.deleted_vertex_arrays.push(vertex_array);

		if state.bound_vertex_array == Some(vertex_array) {
			state.bound_vertex_array = None;
		}
	}

	fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
		self.state.borrow_mut().bound_vertex_array = vertex_array;
	}

	fn attribute_pointer(&self, slot: u32, tuple_width: u32, scalar_type: ScalarType) {
		let mut state = self.state.borrow_mut();
		let Some(buffer) = state.bound_attribute_buffer else {
			log::warn!("attribute pointer for slot {slot} set with no buffer bound");
			return
		};

		state.bound_record().attributes.insert(slot, AttributeSource {
			buffer,
			tuple_width,
			scalar_type,
		});
	}

	fn set_attribute_enabled(&self, slot: u32, enabled: bool) {
		let mut state = self.state.borrow_mut();
		let record = state.bound_record();
		match enabled {
			true => record.enabled.insert(slot),
			false => record.enabled.remove(&slot),
		};
	}

	fn draw_arrays(&self, kind: PrimitiveKind, count: usize) {
		let mut state = self.state.borrow_mut();
		let vertex_array = state.bound_vertex_array;
		let enabled_slots = state.bound_record().enabled.iter().copied().collect();

		state.draws.push(DrawCall {
			vertex_array,
			kind,
			count,
			index_type: None,
			enabled_slots,
		});
	}

	fn draw_elements(&self, kind: PrimitiveKind, count: usize, index_type: IndexType) {
		let mut state = self.state.borrow_mut();
		let vertex_array = state.bound_vertex_array;
		let enabled_slots = state.bound_record().enabled.iter().copied().collect();

		state.draws.push(DrawCall {
			vertex_array,
			kind,
			count,
			index_type: Some(index_type),
			enabled_slots,
		});
	}

	fn max_attribute_slots(&self) -> u32 {
		self.max_attribute_slots
	}
}
