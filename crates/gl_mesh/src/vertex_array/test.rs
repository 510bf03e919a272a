use std::rc::Rc;

use glam::{UVec3, Vec2, Vec3};

use super::{slots, VertexArray, DEFAULT_MAX_ATTRIBUTE_SLOTS};
use crate::{
	buffer::{AttributeBuffer, IndexBuffer},
	device::{Device, RecordingDevice},
	error::{ContractViolation, DeviceError, MeshError},
	tables::MeshTables,
	types::{IndexType, PrimitiveKind},
};

fn quad_3d() -> Vec<Vec3> {
	vec![
		Vec3::new(-1.0, -1.0, 0.0),
		Vec3::new(1.0, -1.0, 0.0),
		Vec3::new(1.0, 1.0, 0.0),
		Vec3::new(-1.0, 1.0, 0.0),
	]
}

fn colored_quad() -> MeshTables {
	MeshTables {
		positions_3d: quad_3d(),
		colors: vec![Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE],
		..Default::default()
	}
}

#[test]
fn test_from_tables_colored_quad() {
	crate::init_test_logger();
	let tables = colored_quad();
	let vertex_array = VertexArray::from_tables(&tables).unwrap();

	assert_eq!(vertex_array.vertex_count(), 4);
	assert!(!vertex_array.is_indexed());
	assert_eq!(vertex_array.index_count(), None);
	assert_eq!(vertex_array.max_slots(), DEFAULT_MAX_ATTRIBUTE_SLOTS);
	assert_eq!(vertex_array.attribute_slots().collect::<Vec<_>>(), vec![
		slots::POSITION,
		slots::COLOR
	]);
	assert!(!vertex_array.is_created());
}

#[test]
fn test_from_tables_rejects_invalid() {
	let both_positions = MeshTables {
		positions_2d: vec![Vec2::ZERO; 4],
		..colored_quad()
	};
	assert!(matches!(
		VertexArray::from_tables(&both_positions),
		Err(ContractViolation::BothPositionTables)
	));

	let both_indices = MeshTables {
		triangles: vec![UVec3::new(0, 1, 2)],
		indices: vec![0, 2, 3],
		..colored_quad()
	};
	assert!(matches!(
		VertexArray::from_tables(&both_indices),
		Err(ContractViolation::BothIndexTables)
	));
}

#[test]
fn test_from_tables_all_attributes() {
	let tables = MeshTables {
		positions_2d: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
		colors: vec![Vec3::ONE; 3],
		normals: vec![Vec3::Z; 3],
		texcoords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
		indices: vec![0, 1, 2],
		..Default::default()
	};
	let vertex_array = VertexArray::from_tables(&tables).unwrap();

	assert_eq!(vertex_array.attribute_slots().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
	assert_eq!(vertex_array.attribute(slots::POSITION).unwrap().tuple_width(), 2);
	assert_eq!(vertex_array.attribute(slots::TEXCOORD).unwrap().tuple_width(), 2);
	assert_eq!(vertex_array.attribute(slots::NORMAL).unwrap().tuple_width(), 3);
	assert_eq!(vertex_array.index_count(), Some(3));
	assert_eq!(vertex_array.index_type(), Some(IndexType::UnsignedInt));
}

#[test]
fn test_position_must_use_slot_zero() {
	let positions = quad_3d();

	assert!(matches!(
		VertexArray::new(AttributeBuffer::from_vec3(1, &positions).unwrap()),
		Err(ContractViolation::PositionSlot(1))
	));
	assert!(matches!(
		VertexArray::with_max_slots(0, AttributeBuffer::from_vec3(0, &positions).unwrap()),
		Err(ContractViolation::NoSlots)
	));
}

#[test]
fn test_add_attribute_preconditions() {
	let positions = quad_3d();
	let colors = vec![Vec3::ONE; 4];
	let short = vec![Vec3::ONE; 3];
	let mut vertex_array =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();

	assert_eq!(
		vertex_array
			.add_attribute(AttributeBuffer::from_vec3(0, &colors).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::ReservedSlot(0))
	);
	assert_eq!(
		vertex_array
			.add_attribute(AttributeBuffer::from_vec3(4, &colors).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::SlotOutOfRange { slot: 4, max: 4 })
	);
	assert_eq!(
		vertex_array
			.add_attribute(AttributeBuffer::from_vec3(1, &short).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::CountMismatch {
			slot: 1,
			expected: 4,
			actual: 3
		})
	);
	assert_eq!(vertex_array.attribute_slots().count(), 1);

	vertex_array.add_attribute(AttributeBuffer::from_vec3(1, &colors).unwrap()).unwrap();
	assert_eq!(
		vertex_array
			.add_attribute(AttributeBuffer::from_vec3(1, &colors).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::SlotOccupied(1))
	);
	assert_eq!(vertex_array.is_attribute_enabled(1), Some(true));
	assert_eq!(vertex_array.attribute_slots().count(), 2);
}

#[test]
fn test_wider_vertex_array() {
	let positions = quad_3d();
	let extra = vec![Vec2::ONE; 4];
	let mut vertex_array =
		VertexArray::with_max_slots(8, AttributeBuffer::from_vec3(0, &positions).unwrap())
			.unwrap();

	vertex_array.add_attribute(AttributeBuffer::from_vec2(7, &extra).unwrap()).unwrap();
	assert_eq!(vertex_array.attribute_slots().collect::<Vec<_>>(), vec![0, 7]);
}

#[test]
fn test_composition_locked_after_create() {
	let device = Rc::new(RecordingDevice::new());
	let tables = colored_quad();
	let normals = vec![Vec3::Z; 4];
	let indices = [0u32, 1, 2];
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	vertex_array.create(&device).unwrap();

	assert_eq!(
		vertex_array
			.add_attribute(AttributeBuffer::from_vec3(2, &normals).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::CompositionLocked)
	);
	assert_eq!(
		vertex_array
			.add_index_buffer(IndexBuffer::new(&indices).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::CompositionLocked)
	);
	assert_eq!(vertex_array.attribute_slots().count(), 2);
	assert!(!vertex_array.is_indexed());
}

#[test]
fn test_single_index_buffer() {
	let positions = quad_3d();
	let indices = [0u16, 1, 2, 2, 3, 0];
	let mut vertex_array =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();

	vertex_array.add_index_buffer(IndexBuffer::new(&indices).unwrap()).unwrap();
	assert_eq!(
		vertex_array
			.add_index_buffer(IndexBuffer::new(&indices).unwrap())
			.map_err(ContractViolation::from),
		Err(ContractViolation::IndexBufferPresent)
	);
	assert_eq!(vertex_array.index_count(), Some(6));
	assert_eq!(vertex_array.index_type(), Some(IndexType::UnsignedShort));
}

#[test]
fn test_create_builds_vertex_array_state() {
	let device = Rc::new(RecordingDevice::new());
	let tables = MeshTables {
		triangles: vec![UVec3::new(0, 1, 2), UVec3::new(2, 3, 0)],
		..colored_quad()
	};
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	vertex_array.create(&device).unwrap();

	let handle = vertex_array.handle().unwrap();
	let record = device.vertex_array(Some(handle)).unwrap();
	let position = vertex_array.attribute(slots::POSITION).unwrap();
	let color = vertex_array.attribute(slots::COLOR).unwrap();

	assert!(position.is_created() && color.is_created());
	assert_eq!(record.attributes[&slots::POSITION].buffer, position.handle().unwrap());
	assert_eq!(record.attributes[&slots::COLOR].buffer, color.handle().unwrap());
	assert_eq!(record.enabled.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
	assert_eq!(record.element_buffer, vertex_array.index_buffer().unwrap().handle());
	assert_eq!(device.live_buffers(), 3);
	assert_eq!(device.bound_vertex_array(), None);
}

#[test]
fn test_create_twice() {
	let device = Rc::new(RecordingDevice::new());
	let tables = colored_quad();
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	vertex_array.create(&device).unwrap();
	let handle = vertex_array.handle();

	assert_eq!(
		vertex_array.create(&device),
		Err(MeshError::Contract(ContractViolation::AlreadyCreated))
	);
	assert_eq!(vertex_array.handle(), handle);
	assert_eq!(device.live_vertex_arrays(), 1);
	assert_eq!(device.live_buffers(), 2);
}

#[test]
fn test_create_respects_device_limit() {
	let device = Rc::new(RecordingDevice::with_max_attribute_slots(2));
	let tables = colored_quad();
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	assert_eq!(
		vertex_array.create(&device),
		Err(MeshError::Device(DeviceError::AttributeLimit {
			requested: 4,
			supported: 2
		}))
	);
	assert_eq!(device.live_vertex_arrays(), 0);
	assert_eq!(device.live_buffers(), 0);
}

#[test]
fn test_create_device_failure_is_retryable() {
	let device = Rc::new(RecordingDevice::new());
	let tables = colored_quad();
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	// vertex array and position buffer succeed, colors fail
	device.fail_after(2);
	let error = vertex_array.create(&device).unwrap_err();
	assert_eq!(error, MeshError::Device(DeviceError::OutOfMemory));
	assert!(!error.is_contract_violation());
	assert!(!vertex_array.is_created());
	assert_eq!(device.live_vertex_arrays(), 0);

	device.fail_after(usize::MAX);
	vertex_array.create(&device).unwrap();

	let record = device.vertex_array(vertex_array.handle()).unwrap();
	assert_eq!(record.attributes.len(), 2);
	assert_eq!(device.live_buffers(), 2);
}

#[test]
fn test_adopts_created_attribute() {
	let device = Rc::new(RecordingDevice::new());
	let positions = quad_3d();
	let colors = vec![Vec3::ONE; 4];

	let mut color = AttributeBuffer::from_vec3(slots::COLOR, &colors).unwrap();
	color.create(&device).unwrap();
	let color_handle = color.handle();

	let mut vertex_array =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();
	vertex_array.add_attribute(color).unwrap();
	vertex_array.create(&device).unwrap();

	let record = device.vertex_array(vertex_array.handle()).unwrap();
	assert_eq!(Some(record.attributes[&slots::COLOR].buffer), color_handle);
	assert!(record.enabled.contains(&slots::COLOR));
	assert_eq!(device.live_buffers(), 2);
}

#[test]
fn test_rejected_attribute_is_handed_back() {
	crate::init_test_logger();
	let device = Rc::new(RecordingDevice::new());
	let positions = quad_3d();
	let colors = vec![Vec3::ONE; 4];

	let mut color = AttributeBuffer::from_vec3(slots::COLOR, &colors).unwrap();
	color.create(&device).unwrap();
	let color_handle = color.handle();

	let mut locked =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();
	locked.create(&device).unwrap();
	assert_eq!(device.live_buffers(), 2);

	let rejected = locked.add_attribute(color).unwrap_err();
	assert_eq!(rejected.violation(), &ContractViolation::CompositionLocked);
	assert!(device.deleted_buffers().is_empty());
	assert_eq!(device.live_buffers(), 2);

	let color = rejected.into_descriptor();
	assert_eq!(color.handle(), color_handle);
	assert_eq!(color.data().map(<[u8]>::len), Some(48));

	let mut occupied =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();
	occupied.add_attribute(AttributeBuffer::from_vec3(slots::COLOR, &colors).unwrap()).unwrap();
	let rejected = occupied.add_attribute(color).unwrap_err();
	assert_eq!(rejected.violation, ContractViolation::SlotOccupied(slots::COLOR));
	assert_eq!(rejected.descriptor.handle(), color_handle);

	// the refused attribute still works in a vertex array that has room
	let mut accepting =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();
	accepting.add_attribute(rejected.into_descriptor()).unwrap();
	accepting.create(&device).unwrap();

	let record = device.vertex_array(accepting.handle()).unwrap();
	assert_eq!(Some(record.attributes[&slots::COLOR].buffer), color_handle);
	assert!(device.deleted_buffers().is_empty());
}

#[test]
fn test_rejected_index_buffer_is_handed_back() {
	let device = Rc::new(RecordingDevice::new());
	let tables = colored_quad();
	let extra = [0u8, 1, 2];

	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();
	let mut indices = IndexBuffer::new(&extra).unwrap();
	indices.create(&device).unwrap();
	let handle = indices.handle();

	let rejected = vertex_array.add_index_buffer(indices).unwrap_err();
	assert_eq!(rejected.violation(), &ContractViolation::IndexBufferPresent);
	assert!(device.deleted_buffers().is_empty());
	assert_eq!(rejected.into_descriptor().handle(), handle);
	assert_eq!(device.deleted_buffers().len(), 1);
}

#[test]
fn test_create_through_erased_device() {
	let device: Rc<dyn Device> = Rc::new(RecordingDevice::new());
	let tables = colored_quad();
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	vertex_array.create(&device).unwrap();
	vertex_array.draw(PrimitiveKind::Triangles).unwrap();
	assert!(vertex_array.attribute(slots::COLOR).unwrap().is_created());
}

#[test]
fn test_draw_requires_create() {
	let tables = colored_quad();
	let vertex_array = VertexArray::from_tables(&tables).unwrap();

	assert_eq!(vertex_array.draw(PrimitiveKind::Triangles), Err(ContractViolation::NotCreated));
}

#[test]
fn test_draw_non_indexed() {
	let device = Rc::new(RecordingDevice::new());
	let tables = colored_quad();
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();
	vertex_array.create(&device).unwrap();

	for kind in [PrimitiveKind::Points, PrimitiveKind::LineLoop, PrimitiveKind::Triangles] {
		vertex_array.draw(kind).unwrap();
	}

	let draws = device.draws();
	assert_eq!(draws.len(), 3);
	for (draw, kind) in draws
		.iter()
		.zip([PrimitiveKind::Points, PrimitiveKind::LineLoop, PrimitiveKind::Triangles])
	{
		assert_eq!(draw.kind, kind);
		assert_eq!(draw.count, 4);
		assert_eq!(draw.index_type, None);
		assert_eq!(draw.vertex_array, vertex_array.handle());
	}
}

#[test]
fn test_draw_indexed_triangles() {
	let device = Rc::new(RecordingDevice::new());
	let positions = quad_3d();
	let triangles = [UVec3::new(0, 1, 2), UVec3::new(2, 3, 0)];

	let indices = IndexBuffer::from_triangles(&triangles).unwrap();
	assert_eq!(indices.count(), 6);

	let mut vertex_array =
		VertexArray::new(AttributeBuffer::from_vec3(0, &positions).unwrap()).unwrap();
	vertex_array.add_index_buffer(indices).unwrap();
	vertex_array.create(&device).unwrap();
	vertex_array.draw(PrimitiveKind::Triangles).unwrap();

	let draws = device.draws();
	assert_eq!(draws.len(), 1);
	assert_eq!(draws[0].kind, PrimitiveKind::Triangles);
	assert_eq!(draws[0].count, 6);
	assert_eq!(draws[0].index_type, Some(IndexType::UnsignedInt));
}

#[test]
fn test_toggle_attributes() {
	let device = Rc::new(RecordingDevice::new());
	let tables = MeshTables {
		normals: vec![Vec3::Z; 4],
		..colored_quad()
	};
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();

	assert_eq!(
		vertex_array.set_attribute_enabled(slots::POSITION, false),
		Err(ContractViolation::PositionLocked)
	);
	assert_eq!(
		vertex_array.set_attribute_enabled(slots::TEXCOORD, false),
		Err(ContractViolation::SlotNotOwned(slots::TEXCOORD))
	);

	// disabled before creation
	vertex_array.set_attribute_enabled(slots::NORMAL, false).unwrap();
	vertex_array.create(&device).unwrap();
	let record = device.vertex_array(vertex_array.handle()).unwrap();
	assert_eq!(record.enabled.iter().copied().collect::<Vec<_>>(), vec![0, 1]);

	vertex_array.draw(PrimitiveKind::Triangles).unwrap();
	vertex_array.set_attribute_enabled(slots::COLOR, false).unwrap();
	vertex_array.draw(PrimitiveKind::Triangles).unwrap();
	vertex_array.set_attribute_enabled(slots::NORMAL, true).unwrap();
	vertex_array.set_attribute_enabled(slots::COLOR, true).unwrap();
	vertex_array.draw(PrimitiveKind::Triangles).unwrap();

	let enabled = device.draws().into_iter().map(|d| d.enabled_slots).collect::<Vec<_>>();
	assert_eq!(enabled, vec![vec![0, 1], vec![0], vec![0, 1, 2]]);
	assert_eq!(vertex_array.is_attribute_enabled(slots::NORMAL), Some(true));
}

#[test]
fn test_counts_survive_draws() {
	let device = Rc::new(RecordingDevice::new());
	let positions = vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE, Vec2::NEG_X];
	let mut vertex_array =
		VertexArray::new(AttributeBuffer::from_vec2(0, &positions).unwrap()).unwrap();
	vertex_array.create(&device).unwrap();

	for _ in 0..10 {
		vertex_array.draw(PrimitiveKind::LineStrip).unwrap();
	}

	let position = vertex_array.attribute(slots::POSITION).unwrap();
	assert_eq!(position.count(), 5);
	assert_eq!(position.slot(), 0);
	assert_eq!(vertex_array.vertex_count(), 5);
	assert!(device.draws().iter().all(|d| d.count == 5));
}

#[test]
fn test_drop_releases_everything() {
	let device = Rc::new(RecordingDevice::new());
	let tables = MeshTables {
		indices: vec![0, 1, 2, 2, 3, 0],
		..colored_quad()
	};
	let mut vertex_array = VertexArray::from_tables(&tables).unwrap();
	vertex_array.create(&device).unwrap();
	let handle = vertex_array.handle().unwrap();
	assert_eq!(device.live_buffers(), 3);

	drop(vertex_array);

	assert_eq!(device.live_buffers(), 0);
	assert_eq!(device.live_vertex_arrays(), 0);
	assert_eq!(device.deleted_buffers().len(), 3);
	assert_eq!(device.deleted_vertex_arrays(), vec![handle]);
}

#[test]
fn test_into_owned_outlives_tables() {
	let device = Rc::new(RecordingDevice::new());

	let vertex_array: VertexArray<'static> = {
		let tables = MeshTables {
			triangles: vec![UVec3::new(0, 1, 2)],
			..colored_quad()
		};
		let mut vertex_array = VertexArray::from_tables(&tables).unwrap();
		vertex_array.set_attribute_enabled(slots::COLOR, false).unwrap();
		vertex_array.create(&device).unwrap();
		vertex_array.into_owned().unwrap()
	};

	vertex_array.draw(PrimitiveKind::Triangles).unwrap();

	let draw = device.last_draw().unwrap();
	assert_eq!(draw.count, 3);
	assert_eq!(draw.enabled_slots, vec![0]);
	assert_eq!(vertex_array.attribute(slots::COLOR).unwrap().data().map(<[u8]>::len), Some(48));
	assert_eq!(device.live_buffers(), 3);
}

#[test]
fn test_into_owned_requires_create() {
	let tables = colored_quad();
	let vertex_array = VertexArray::from_tables(&tables).unwrap();

	assert!(matches!(vertex_array.into_owned(), Err(ContractViolation::NotCreated)));
}
