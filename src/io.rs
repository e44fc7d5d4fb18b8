//! Reading and writing meshes and discrete solutions.
pub mod mesh_file;
pub mod samples;
