// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

//! Random 2d point cloud, drawn as points and then as a line strip
//! through a flat index table

use gl_mesh::{MeshTables, PrimitiveKind, VertexArray};
use gl_mesh_tests::shader::ColorShader;
use glam::{Vec2, Vec3};
use rand::Rng;

const POINTS: usize = 2000;
const STRIP: u32 = 64;

fn main() {
	gl_mesh_tests::view_window("point_cloud", false, |device| {
		let shader = unsafe { ColorShader::new() }.expect("could not build shader");
		let mut rng = rand::thread_rng();

		let positions = (0..POINTS)
			.map(|_| Vec2::new(rng.gen_range(-0.9..0.9), rng.gen_range(-0.9..0.9)))
			.collect::<Vec<_>>();
		let colors = positions
			.iter()
			.map(|p| Vec3::new(p.x * 0.5 + 0.5, p.y * 0.5 + 0.5, 0.8))
			.collect::<Vec<_>>();

		let cloud_tables = MeshTables {
			positions_2d: positions.clone(),
			colors: colors.clone(),
			..Default::default()
		};
		let strip_tables = MeshTables {
			positions_2d: positions,
			colors,
			indices: (0..STRIP).collect(),
			..Default::default()
		};

		let mut cloud = VertexArray::from_tables(&cloud_tables).expect("invalid cloud tables");
		let mut strip = VertexArray::from_tables(&strip_tables).expect("invalid strip tables");
		cloud.create(&device).expect("could not create cloud");
		strip.create(&device).expect("could not create strip");
		let cloud = cloud.into_owned().expect("cloud was created above");
		let strip = strip.into_owned().expect("strip was created above");

		log::info!(
			"{} points, strip through {} of them",
			cloud.vertex_count(),
			strip.index_count().unwrap_or(0)
		);

		// loop
		move |_: f64| {
			shader.bind();
			let drawn = cloud
				.draw(PrimitiveKind::Points)
				.and_then(|_| strip.draw(PrimitiveKind::LineStrip));
			if let Err(e) = drawn {
				log::error!("draw failed: {e}");
			}
		}
	});
}
