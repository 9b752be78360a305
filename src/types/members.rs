use crate::{
    cache::{MemberInfo, MemberKind},
    resolution::ResolutionS,
    types::TypeDescription,
};
use dotnetdll::{
    prelude::{Field, Method, ResolvedDebug},
    resolved::members::{Event, Property},
};
use enum_dispatch::enum_dispatch;
use std::{
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
};

/// Equality and hashing by metadata address, plus the thread-safety impls every description shares.
macro_rules! member_description {
    ($name:ident, $field:ident: $meta:ident, $kind:expr) => {
        // SAFETY: descriptions only point into leaked metadata that is never mutated
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.$field, other.$field)
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                (self.$field as *const $meta).hash(state);
            }
        }

        impl MemberInfo for $name {
            fn name(&self) -> &str {
                &self.$field.name
            }

            fn kind(&self) -> MemberKind {
                $kind
            }
        }
    };
}

#[derive(Clone, Copy)]
pub struct MethodDescription {
    pub parent: TypeDescription,
    pub method: &'static Method<'static>,
}
member_description!(MethodDescription, method: Method, MemberKind::Method);

impl MethodDescription {
    pub fn resolution(&self) -> ResolutionS {
        self.parent.resolution
    }
}

impl Debug for MethodDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.method.signature.show_with_name(
                self.resolution().definition(),
                format!("{}::{}", self.parent.type_name(), self.method.name)
            )
        )
    }
}

#[derive(Clone, Copy)]
pub struct FieldDescription {
    pub parent: TypeDescription,
    pub field: &'static Field<'static>,
}
member_description!(FieldDescription, field: Field, MemberKind::Field);

impl Debug for FieldDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.field.static_member {
            write!(f, "static ")?;
        }

        write!(
            f,
            "{} {}::{}",
            self.field
                .return_type
                .show(self.parent.resolution.definition()),
            self.parent.type_name(),
            self.field.name
        )
    }
}

#[derive(Clone, Copy)]
pub struct PropertyDescription {
    pub parent: TypeDescription,
    pub property: &'static Property<'static>,
}
member_description!(PropertyDescription, property: Property, MemberKind::Property);

impl Debug for PropertyDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "property {}::{}", self.parent.type_name(), self.property.name)
    }
}

#[derive(Clone, Copy)]
pub struct EventDescription {
    pub parent: TypeDescription,
    pub event: &'static Event<'static>,
}
member_description!(EventDescription, event: Event, MemberKind::Event);

impl Debug for EventDescription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "event {}::{}", self.parent.type_name(), self.event.name)
    }
}

/// Any one declared member, whatever its kind.
#[enum_dispatch(MemberInfo)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredMember {
    MethodDescription,
    FieldDescription,
    PropertyDescription,
    EventDescription,
}

impl Debug for DeclaredMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredMember::MethodDescription(m) => m.fmt(f),
            DeclaredMember::FieldDescription(x) => x.fmt(f),
            DeclaredMember::PropertyDescription(p) => p.fmt(f),
            DeclaredMember::EventDescription(e) => e.fmt(f),
        }
    }
}
