use crate::{error::MetadataError, types::TypeDescription};
use dotnetdll::prelude::*;
use std::{
    fmt::{Debug, Formatter},
    hash::Hash,
    io::ErrorKind,
    path::Path,
    ptr::NonNull,
};

/// A loaded resolution that lives for the rest of the process.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct ResolutionS(NonNull<Resolution<'static>>);
// SAFETY: ResolutionS is a transparent wrapper around a NonNull pointer to Resolution.
// Resolutions are leaked on load and never freed or mutated afterwards.
unsafe impl Send for ResolutionS {}
unsafe impl Sync for ResolutionS {}
impl ResolutionS {
    pub fn new(resolution: &'static Resolution<'static>) -> Self {
        Self(NonNull::from(resolution))
    }

    pub fn as_raw(self) -> *const Resolution<'static> {
        self.0.as_ptr()
    }

    pub fn definition(&self) -> &'static Resolution<'static> {
        // SAFETY: the pointer comes from a leaked &'static Resolution
        unsafe { &*self.0.as_ptr() }
    }

    /// Finds a type definition by its full name, either `Namespace.Name` or the nested
    /// form `Namespace.Outer/Inner`.
    pub fn find_type(self, name: &str) -> Result<TypeDescription, MetadataError> {
        let res = self.definition();
        res.type_definitions
            .iter()
            .find(|t| t.type_name() == name || t.nested_type_name(res) == name)
            .map(|t| TypeDescription::new(self, t))
            .ok_or_else(|| MetadataError::TypeNotFound(name.to_string()))
    }

    pub fn assembly_name(&self) -> Option<&'static str> {
        self.definition().assembly.as_ref().map(|a| a.name.as_ref())
    }
}
impl Debug for ResolutionS {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ResolutionS({} @ {:#?})",
            self.assembly_name().unwrap_or("<module>"),
            self.as_raw()
        )
    }
}
impl PartialEq for ResolutionS {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for ResolutionS {}
impl Hash for ResolutionS {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

pub fn static_res_from_file(path: impl AsRef<Path>) -> Result<ResolutionS, MetadataError> {
    let path = path.as_ref();
    let buf = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MetadataError::FileNotFound(path.display().to_string()),
        _ => MetadataError::Io(format!("{}: {}", path.display(), e)),
    })?;
    let resolution = Resolution::parse(Box::leak(buf.into_boxed_slice()), ReadOptions::default())
        .map_err(|e| MetadataError::InvalidFormat(format!("{}: {:?}", path.display(), e)))?;
    Ok(ResolutionS::new(Box::leak(Box::new(resolution))))
}
