// Copyright (C) 2022 the ITK authors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/./

use glam::{UVec3, Vec2, Vec3};

use crate::error::ContractViolation;


/// Candidate tables for a [`VertexArray`](crate::VertexArray).
///
/// * positions are either 2d or 3d, exactly one of the two tables is filled
/// * colors, normals and texture coordinates are optional, but when present
///   they hold one entry per position
/// * at most one of `triangles` and `indices` is filled, with neither the
///   mesh is drawn as a plain vertex sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshTables {
	pub positions_3d: Vec<Vec3>,
	pub positions_2d: Vec<Vec2>,
	pub colors: Vec<Vec3>,
	pub normals: Vec<Vec3>,
	pub texcoords: Vec<Vec2>,
	pub triangles: Vec<UVec3>,
	pub indices: Vec<u32>,
}

impl MeshTables {
	pub fn validate(&self) -> Result<(), ContractViolation> {
		match (self.positions_3d.is_empty(), self.positions_2d.is_empty()) {
			(false, false) => return Err(ContractViolation::BothPositionTables),
			(true, true) => return Err(ContractViolation::NoPositionTable),
			_ => {},
		}

		if !self.triangles.is_empty() && !self.indices.is_empty() {
			return Err(ContractViolation::BothIndexTables)
		}

		let expected = self.vertex_count();
		for (table, actual) in [
			("colors", self.colors.len()),
			("normals", self.normals.len()),
			("texcoords", self.texcoords.len()),
		] {
			if actual != 0 && actual != expected {
				return Err(ContractViolation::TableLength {
					table,
					expected,
					actual,
				})
			}
		}

		Ok(())
	}

	/// Number of positions, whichever table holds them
	#[inline]
	pub fn vertex_count(&self) -> usize {
		self.positions_3d.len().max(self.positions_2d.len())
	}

	#[inline]
	pub fn is_indexed(&self) -> bool {
		!(self.triangles.is_empty() && self.indices.is_empty())
	}

	/// Number of indices once triangles are flattened
	#[inline]
	pub fn index_count(&self) -> usize {
		self.triangles.len() * 3 + self.indices.len()
	}
}
