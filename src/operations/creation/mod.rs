mod make_box;
mod make_grid;
mod make_polygon_mesh;

pub use make_box::MakeBox;
pub use make_grid::MakeGrid;
pub use make_polygon_mesh::MakePolygonMesh;
