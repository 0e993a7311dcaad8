// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! A convex polytope tagged with a reference frame.
//!
//! Vertices, half-edges and faces are handed out as borrowed views. A view has
//! no frame of its own: it reports the frame of the polytope it was taken
//! from, so the elements can never disagree with their owner.

use orrery_core::math::{GeometricEq, Point3, RigidTransform, Transformable, Vec3};
use orrery_core::shape::{Box3, ConvexPolytope3, Face3, HalfEdge3, Ramp3};
use orrery_frame::{
    ensure, ApiEntry, FixedFrameLineSegment3, FixedFrameMutable, FixedFramePoint3, FixedFrameVector3,
    FrameApi, FrameBoundingBox3, FrameError, FrameHolder, FrameKind, FrameMutable, FramePoint3,
    FrameReadOnly, FrameVector3, FrameVertex3Supplier, Framed, Operand, ReferenceFrame,
};

use crate::error::{Result, ShapeError};
use crate::frame_shape::FrameShape3;

/// A [`ConvexPolytope3`] expressed in a reference frame.
#[derive(Debug, Clone)]
pub struct FrameConvexPolytope3 {
    frame: ReferenceFrame,
    polytope: ConvexPolytope3,
}

impl FrameConvexPolytope3 {
    /// An empty polytope in `frame`.
    pub fn new(frame: &ReferenceFrame) -> Self {
        Self::from_frameless(frame, ConvexPolytope3::new())
    }

    pub fn from_frameless(frame: &ReferenceFrame, polytope: ConvexPolytope3) -> Self {
        Self {
            frame: frame.clone(),
            polytope,
        }
    }

    /// The hull of the supplied vertices, which must all be in `frame`.
    pub fn from_vertices<S>(frame: &ReferenceFrame, vertices: &S) -> std::result::Result<Self, FrameError>
    where
        S: FrameVertex3Supplier + ?Sized,
    {
        let points = vertices.frameless_vertices_in(frame)?;
        Ok(Self::from_frameless(frame, ConvexPolytope3::from_points(&points)))
    }

    pub fn from_box(frame: &ReferenceFrame, shape: &Box3) -> Self {
        Self::from_frameless(frame, ConvexPolytope3::from_box(shape))
    }

    pub fn from_ramp(frame: &ReferenceFrame, shape: &Ramp3) -> Self {
        Self::from_frameless(frame, ConvexPolytope3::from_ramp(shape))
    }

    // --- Building ---

    /// Adds one vertex and rebuilds the hull.
    pub fn add_vertex<K: FrameKind>(&mut self, vertex: &Framed<Point3, K>) -> std::result::Result<(), FrameError> {
        self.check_reference_frame_match(vertex)?;
        self.polytope.add_vertex(*vertex.frameless());
        Ok(())
    }

    /// Adds every supplied vertex and rebuilds the hull once. Nothing is added
    /// if one of the vertices is in another frame.
    pub fn add_vertices<S>(&mut self, vertices: &S) -> std::result::Result<(), FrameError>
    where
        S: FrameVertex3Supplier + ?Sized,
    {
        let points = vertices.frameless_vertices_in(&self.frame)?;
        self.polytope.add_vertices(points);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.polytope.clear();
    }

    // --- Topology ---

    pub fn is_empty(&self) -> bool {
        self.polytope.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.polytope.vertices().len()
    }

    pub fn face_count(&self) -> usize {
        self.polytope.faces().len()
    }

    pub fn edge_count(&self) -> usize {
        self.polytope.edge_count()
    }

    pub fn vertex(&self, index: usize) -> Option<FrameVertex3View<'_>> {
        (index < self.vertex_count()).then_some(FrameVertex3View { owner: self, index })
    }

    pub fn vertices(&self) -> impl Iterator<Item = FrameVertex3View<'_>> + '_ {
        (0..self.vertex_count()).map(move |index| FrameVertex3View { owner: self, index })
    }

    pub fn half_edge(&self, index: usize) -> Option<FrameHalfEdge3View<'_>> {
        (index < self.polytope.half_edges().len()).then_some(FrameHalfEdge3View { owner: self, index })
    }

    pub fn half_edges(&self) -> impl Iterator<Item = FrameHalfEdge3View<'_>> + '_ {
        (0..self.polytope.half_edges().len()).map(move |index| FrameHalfEdge3View { owner: self, index })
    }

    pub fn face(&self, index: usize) -> Option<FrameFace3View<'_>> {
        (index < self.face_count()).then_some(FrameFace3View { owner: self, index })
    }

    pub fn faces(&self) -> impl Iterator<Item = FrameFace3View<'_>> + '_ {
        (0..self.face_count()).map(move |index| FrameFace3View { owner: self, index })
    }

    // --- Queries ---

    /// Whether `point` is inside, or within `epsilon` outside of, the polytope.
    pub fn is_point_inside<K: FrameKind>(
        &self,
        point: &Framed<Point3, K>,
        epsilon: f32,
    ) -> std::result::Result<bool, FrameError> {
        self.check_reference_frame_match(point)?;
        Ok(self.polytope.is_point_inside(*point.frameless(), epsilon))
    }

    /// Signed distance from `point` to the surface, negative inside.
    pub fn signed_distance<K: FrameKind>(&self, point: &Framed<Point3, K>) -> Result<f32> {
        self.check_reference_frame_match(point)?;
        self.polytope
            .signed_distance(*point.frameless())
            .ok_or(ShapeError::EmptyPolytope)
    }

    pub fn closest_point<K: FrameKind>(&self, point: &Framed<Point3, K>) -> Result<FixedFramePoint3> {
        self.check_reference_frame_match(point)?;
        self.polytope
            .closest_point(*point.frameless())
            .map(|p| Framed::new(&self.frame, p))
            .ok_or(ShapeError::EmptyPolytope)
    }

    /// The vertex furthest along `direction`.
    pub fn support_vertex<K: FrameKind>(&self, direction: &Framed<Vec3, K>) -> Result<FixedFramePoint3> {
        self.check_reference_frame_match(direction)?;
        self.polytope
            .support_vertex(*direction.frameless())
            .map(|p| Framed::new(&self.frame, p))
            .ok_or(ShapeError::EmptyPolytope)
    }

    pub fn centroid(&self) -> Option<FixedFramePoint3> {
        self.polytope.centroid().map(|p| Framed::new(&self.frame, p))
    }

    pub fn volume(&self) -> f32 {
        self.polytope.volume()
    }

    pub fn bounding_box(&self) -> Option<FrameBoundingBox3> {
        self.polytope
            .bounding_box()
            .map(|bbox| Framed::new(&self.frame, bbox))
    }

    /// The polytope as a generic shape in the same frame.
    pub fn to_shape(&self) -> FrameShape3 {
        FrameShape3::new(&self.frame, self.polytope.clone())
    }

    /// Same vertex set within `epsilon`, in any order.
    pub fn geometrically_equals(
        &self,
        other: &FrameConvexPolytope3,
        epsilon: f32,
    ) -> std::result::Result<bool, FrameError> {
        self.check_reference_frame_match(other)?;
        Ok(self.polytope.geometrically_equals(&other.polytope, epsilon))
    }

    pub fn epsilon_equals(
        &self,
        other: &FrameConvexPolytope3,
        epsilon: f32,
    ) -> std::result::Result<bool, FrameError> {
        self.geometrically_equals(other, epsilon)
    }

    pub fn apply_transform(&mut self, transform: &RigidTransform) {
        self.polytope.apply_transform(transform);
    }
}

impl FrameHolder for FrameConvexPolytope3 {
    fn reference_frame(&self) -> &ReferenceFrame {
        &self.frame
    }
}

impl FrameReadOnly<ConvexPolytope3> for FrameConvexPolytope3 {
    fn frameless(&self) -> &ConvexPolytope3 {
        &self.polytope
    }
}

impl FixedFrameMutable<ConvexPolytope3> for FrameConvexPolytope3 {
    fn frameless_mut(&mut self) -> &mut ConvexPolytope3 {
        &mut self.polytope
    }
}

impl FrameMutable<ConvexPolytope3> for FrameConvexPolytope3 {
    fn set_reference_frame(&mut self, frame: &ReferenceFrame) {
        self.frame = frame.clone();
    }
}

impl PartialEq for FrameConvexPolytope3 {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.polytope == other.polytope
    }
}

// --- Element views ---

/// A vertex of a [`FrameConvexPolytope3`].
#[derive(Debug, Clone, Copy)]
pub struct FrameVertex3View<'a> {
    owner: &'a FrameConvexPolytope3,
    index: usize,
}

impl<'a> FrameVertex3View<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> FixedFramePoint3 {
        Framed::new(&self.owner.frame, self.owner.polytope.vertices()[self.index])
    }

    pub fn distance<K: FrameKind>(&self, point: &Framed<Point3, K>) -> std::result::Result<f32, FrameError> {
        self.check_reference_frame_match(point)?;
        Ok(self.frameless().distance(*point.frameless()))
    }
}

impl FrameHolder for FrameVertex3View<'_> {
    fn reference_frame(&self) -> &ReferenceFrame {
        &self.owner.frame
    }
}

impl FrameReadOnly<Point3> for FrameVertex3View<'_> {
    fn frameless(&self) -> &Point3 {
        &self.owner.polytope.vertices()[self.index]
    }
}

/// A directed edge of a [`FrameConvexPolytope3`].
#[derive(Debug, Clone, Copy)]
pub struct FrameHalfEdge3View<'a> {
    owner: &'a FrameConvexPolytope3,
    index: usize,
}

impl<'a> FrameHalfEdge3View<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    fn edge(&self) -> &'a HalfEdge3 {
        &self.owner.polytope.half_edges()[self.index]
    }

    pub fn origin(&self) -> FrameVertex3View<'a> {
        FrameVertex3View {
            owner: self.owner,
            index: self.edge().origin,
        }
    }

    pub fn destination(&self) -> FrameVertex3View<'a> {
        FrameVertex3View {
            owner: self.owner,
            index: self.edge().destination,
        }
    }

    /// The opposite edge on the neighbouring face. `None` on a flat polytope.
    pub fn twin(&self) -> Option<FrameHalfEdge3View<'a>> {
        self.edge().twin.map(|index| FrameHalfEdge3View {
            owner: self.owner,
            index,
        })
    }

    pub fn next(&self) -> FrameHalfEdge3View<'a> {
        FrameHalfEdge3View {
            owner: self.owner,
            index: self.edge().next,
        }
    }

    pub fn face(&self) -> FrameFace3View<'a> {
        FrameFace3View {
            owner: self.owner,
            index: self.edge().face,
        }
    }

    pub fn direction(&self) -> FixedFrameVector3 {
        Framed::new(
            &self.owner.frame,
            *self.destination().frameless() - *self.origin().frameless(),
        )
    }

    pub fn to_segment(&self) -> FixedFrameLineSegment3 {
        Framed::new(
            &self.owner.frame,
            orrery_core::math::LineSegment3::new(*self.origin().frameless(), *self.destination().frameless()),
        )
    }
}

impl FrameHolder for FrameHalfEdge3View<'_> {
    fn reference_frame(&self) -> &ReferenceFrame {
        &self.owner.frame
    }
}

impl FrameReadOnly<HalfEdge3> for FrameHalfEdge3View<'_> {
    fn frameless(&self) -> &HalfEdge3 {
        self.edge()
    }
}

/// A face of a [`FrameConvexPolytope3`].
#[derive(Debug, Clone, Copy)]
pub struct FrameFace3View<'a> {
    owner: &'a FrameConvexPolytope3,
    index: usize,
}

impl<'a> FrameFace3View<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    fn face(&self) -> &'a Face3 {
        &self.owner.polytope.faces()[self.index]
    }

    /// Outward unit normal.
    pub fn normal(&self) -> FixedFrameVector3 {
        Framed::new(&self.owner.frame, self.face().normal)
    }

    pub fn vertex_count(&self) -> usize {
        self.face().vertices.len()
    }

    /// Vertices, counter-clockwise seen from outside.
    pub fn vertices(&self) -> impl Iterator<Item = FrameVertex3View<'a>> + 'a {
        let owner = self.owner;
        self.face()
            .vertices
            .iter()
            .map(move |&index| FrameVertex3View { owner, index })
    }

    pub fn half_edges(&self) -> impl Iterator<Item = FrameHalfEdge3View<'a>> + 'a {
        let owner = self.owner;
        self.face()
            .half_edges
            .iter()
            .map(move |&index| FrameHalfEdge3View { owner, index })
    }

    /// Signed distance from `point` to the supporting plane, positive outside.
    pub fn plane_distance<K: FrameKind>(&self, point: &Framed<Point3, K>) -> std::result::Result<f32, FrameError> {
        self.check_reference_frame_match(point)?;
        Ok(self.face().plane_distance(*point.frameless()))
    }

    /// Whether the face looks towards `point`.
    pub fn can_see<K: FrameKind>(&self, point: &Framed<Point3, K>) -> std::result::Result<bool, FrameError> {
        Ok(self.plane_distance(point)? > 0.0)
    }
}

impl FrameHolder for FrameFace3View<'_> {
    fn reference_frame(&self) -> &ReferenceFrame {
        &self.owner.frame
    }
}

impl FrameReadOnly<Face3> for FrameFace3View<'_> {
    fn frameless(&self) -> &Face3 {
        self.face()
    }
}

fn unit_cube(frame: &ReferenceFrame) -> FrameConvexPolytope3 {
    FrameConvexPolytope3::from_box(frame, &Box3::from_center_size(Point3::ORIGIN, Vec3::ONE))
}

inventory::submit! {
    FrameApi {
        kind: "FrameConvexPolytope3",
        frameless: "ConvexPolytope3",
        operations: &[
            ApiEntry::loose("equals", |a, b| ensure(unit_cube(a) != unit_cube(b), a, b)),
            ApiEntry::checked("epsilon_equals", |a, b| {
                unit_cube(a).epsilon_equals(&unit_cube(b), 1e-5).map(drop)
            }),
            ApiEntry::checked("geometrically_equals", |a, b| {
                unit_cube(a).geometrically_equals(&unit_cube(b), 1e-5).map(drop)
            }),
            ApiEntry::checked("set", |a, b| unit_cube(a).set(&unit_cube(b))),
            ApiEntry::checked("add_vertex", |a, b| {
                unit_cube(a).add_vertex(&FramePoint3::zero(b))
            }),
            ApiEntry::checked("add_vertices", |a, b| {
                unit_cube(a).add_vertices(&[FramePoint3::zero(b)])
            }),
            ApiEntry::checked("is_point_inside", |a, b| {
                unit_cube(a).is_point_inside(&FramePoint3::zero(b), 0.0).map(drop)
            }),
            ApiEntry::checked("plane_distance", |a, b| {
                let cube = unit_cube(a);
                match cube.face(0) {
                    Some(face) => face.plane_distance(&FramePoint3::zero(b)).map(drop),
                    None => Ok(()),
                }
            }),
            ApiEntry::checked("vertex_distance", |a, b| {
                let cube = unit_cube(a);
                match cube.vertex(0) {
                    Some(vertex) => vertex.distance(&FramePoint3::zero(b)).map(drop),
                    None => Ok(()),
                }
            }),
            ApiEntry::checked("support_vertex", |a, b| {
                match unit_cube(a).support_vertex(&FrameVector3::new(b, Vec3::X)) {
                    Err(ShapeError::Frame(e)) => Err(e),
                    _ => Ok(()),
                }
            }),
            ApiEntry::frame_changing("change_frame", Operand::Frame, |a, b| {
                unit_cube(a).change_frame(b)
            }),
            ApiEntry::frame_changing("set_including_frame", Operand::FrameTagged, |a, b| {
                unit_cube(a).set_including_frame(&unit_cube(b));
                Ok(())
            }),
            ApiEntry::frame_changing("set_matching_frame", Operand::FrameTagged, |a, b| {
                unit_cube(a).set_matching_frame(&unit_cube(b))
            }),
            ApiEntry::frame_changing("round_trip", Operand::Frame, |a, b| {
                let before = unit_cube(a);
                let mut value = before.clone();
                value.change_frame(b)?;
                value.change_frame(a)?;
                ensure(value.geometrically_equals(&before, 1e-4)?, a, b)
            }),
            ApiEntry::unchecked("set_frameless", Operand::Frameless),
            ApiEntry::unchecked("apply_transform", Operand::Frameless),
            ApiEntry::unchecked("centroid", Operand::None),
            ApiEntry::unchecked("volume", Operand::None),
        ],
    }
}
