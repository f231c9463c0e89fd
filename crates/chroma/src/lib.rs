#![doc = include_str!("../README.md")]

#[doc(inline)]
pub use chroma_image as image;

#[doc(inline)]
pub use chroma_imgproc as imgproc;
