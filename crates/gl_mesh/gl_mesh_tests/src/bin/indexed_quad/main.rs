// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! Colored quad from a triangle table, drawn indexed

use gl_mesh::{MeshTables, PrimitiveKind, VertexArray};
use gl_mesh_tests::shader::ColorShader;
use glam::{UVec3, Vec3};

fn main() {
	gl_mesh_tests::view_window("indexed_quad", true, |device| {
		let shader = unsafe { ColorShader::new() }.expect("could not build shader");

		let tables = MeshTables {
			positions_3d: vec![
				Vec3::new(-0.6, -0.6, 0.0),
				Vec3::new(0.6, -0.6, 0.0),
				Vec3::new(0.6, 0.6, 0.0),
				Vec3::new(-0.6, 0.6, 0.0),
			],
			colors: vec![
				Vec3::new(1.0, 0.2, 0.2),
				Vec3::new(0.2, 1.0, 0.2),
				Vec3::new(0.2, 0.2, 1.0),
				Vec3::new(1.0, 1.0, 0.2),
			],
			triangles: vec![UVec3::new(0, 1, 2), UVec3::new(2, 3, 0)],
			..Default::default()
		};

		let mut quad = VertexArray::from_tables(&tables).expect("invalid quad tables");
		quad.create(&device).expect("could not create quad");
		let quad = quad.into_owned().expect("quad was created above");

		// loop
		move |_: f64| {
			shader.bind();
			if let Err(e) = quad.draw(PrimitiveKind::Triangles) {
				log::error!("draw failed: {e}");
			}
		}
	});
}
