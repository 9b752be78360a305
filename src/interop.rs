//! Native layout of the COM `TYPEATTR` block.
//!
//! These types are plain value mirrors of the platform structures; field order and
//! widths must match the native ABI exactly.
use std::{
    ffi::c_void,
    fmt::{self, Display, Formatter},
    ptr,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Display for Guid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeKind(pub i32);

impl TypeKind {
    pub const ENUM: Self = TypeKind(0);
    pub const RECORD: Self = TypeKind(1);
    pub const MODULE: Self = TypeKind(2);
    pub const INTERFACE: Self = TypeKind(3);
    pub const DISPATCH: Self = TypeKind(4);
    pub const COCLASS: Self = TypeKind(5);
    pub const ALIAS: Self = TypeKind(6);
    pub const UNION: Self = TypeKind(7);
    pub const MAX: Self = TypeKind(8);
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeFlags(pub i16);

impl TypeFlags {
    pub const APP_OBJECT: Self = TypeFlags(0x0001);
    pub const CAN_CREATE: Self = TypeFlags(0x0002);
    pub const LICENSED: Self = TypeFlags(0x0004);
    pub const PREDECL_ID: Self = TypeFlags(0x0008);
    pub const HIDDEN: Self = TypeFlags(0x0010);
    pub const CONTROL: Self = TypeFlags(0x0020);
    pub const DUAL: Self = TypeFlags(0x0040);
    pub const NON_EXTENSIBLE: Self = TypeFlags(0x0080);
    pub const OLE_AUTOMATION: Self = TypeFlags(0x0100);
    pub const RESTRICTED: Self = TypeFlags(0x0200);
    pub const AGGREGATABLE: Self = TypeFlags(0x0400);
    pub const REPLACEABLE: Self = TypeFlags(0x0800);
    pub const DISPATCHABLE: Self = TypeFlags(0x1000);
    pub const REVERSE_BIND: Self = TypeFlags(0x2000);
    pub const PROXY: Self = TypeFlags(0x4000);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TypeFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        TypeFlags(self.0 | rhs.0)
    }
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IdlFlags(pub i16);

impl IdlFlags {
    pub const NONE: Self = IdlFlags(0);
    pub const IN: Self = IdlFlags(0x1);
    pub const OUT: Self = IdlFlags(0x2);
    pub const LCID: Self = IdlFlags(0x4);
    pub const RETVAL: Self = IdlFlags(0x8);
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeDesc {
    pub lp_value: *mut c_void,
    pub vt: i16,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdlDesc {
    pub dw_reserved: *mut c_void,
    pub w_idl_flags: IdlFlags,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeAttr {
    pub guid: Guid,
    pub lcid: i32,
    pub dw_reserved: i32,
    pub memid_constructor: i32,
    pub memid_destructor: i32,
    pub lpstr_schema: *mut u16,
    pub cb_size_instance: i32,
    pub typekind: TypeKind,
    pub c_funcs: i16,
    pub c_vars: i16,
    pub c_impl_types: i16,
    pub cb_size_vft: i16,
    pub cb_alignment: i16,
    pub w_type_flags: TypeFlags,
    pub w_major_ver_num: i16,
    pub w_minor_ver_num: i16,
    pub tdesc_alias: TypeDesc,
    pub idldesc_type: IdlDesc,
}

impl TypeAttr {
    /// Member id meaning "no such member", `0xFFFFFFFF` read as a signed 32-bit value.
    pub const MEMBER_ID_NIL: i32 = 0xFFFF_FFFFu32 as i32;

    pub fn has_constructor(&self) -> bool {
        self.memid_constructor != Self::MEMBER_ID_NIL
    }

    pub fn has_destructor(&self) -> bool {
        self.memid_destructor != Self::MEMBER_ID_NIL
    }
}

impl Default for TypeAttr {
    fn default() -> Self {
        Self {
            guid: Guid::default(),
            lcid: 0,
            dw_reserved: 0,
            memid_constructor: Self::MEMBER_ID_NIL,
            memid_destructor: Self::MEMBER_ID_NIL,
            lpstr_schema: ptr::null_mut(),
            cb_size_instance: 0,
            typekind: TypeKind::default(),
            c_funcs: 0,
            c_vars: 0,
            c_impl_types: 0,
            cb_size_vft: 0,
            cb_alignment: 0,
            w_type_flags: TypeFlags::default(),
            w_major_ver_num: 0,
            w_minor_ver_num: 0,
            tdesc_alias: TypeDesc {
                lp_value: ptr::null_mut(),
                vt: 0,
            },
            idldesc_type: IdlDesc {
                dw_reserved: ptr::null_mut(),
                w_idl_flags: IdlFlags::NONE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, offset_of, size_of};

    #[test]
    fn test_member_id_nil_is_minus_one() {
        assert_eq!(TypeAttr::MEMBER_ID_NIL, -1);
        assert_eq!(TypeAttr::MEMBER_ID_NIL as u32, 0xFFFF_FFFF);
    }

    #[test]
    fn test_constructor_and_destructor_ids() {
        let mut attr = TypeAttr::default();
        assert!(!attr.has_constructor());
        assert!(!attr.has_destructor());
        attr.memid_constructor = 0x6000_0001;
        assert!(attr.has_constructor());
        assert!(!attr.has_destructor());
    }

    #[test]
    fn test_native_layout() {
        let ptr = size_of::<*mut c_void>();
        assert_eq!(size_of::<Guid>(), 16);
        assert_eq!(offset_of!(TypeAttr, lcid), 16);
        assert_eq!(offset_of!(TypeAttr, memid_destructor), 28);
        assert_eq!(offset_of!(TypeAttr, lpstr_schema), 32);
        assert_eq!(offset_of!(TypeAttr, cb_size_instance), 32 + ptr);
        assert_eq!(offset_of!(TypeAttr, typekind), 36 + ptr);
        assert_eq!(offset_of!(TypeAttr, c_funcs), 40 + ptr);
        assert_eq!(offset_of!(TypeAttr, w_type_flags), 50 + ptr);
        assert_eq!(offset_of!(TypeAttr, w_minor_ver_num), 54 + ptr);
        assert_eq!(offset_of!(TypeAttr, tdesc_alias) % align_of::<TypeDesc>(), 0);
        assert_eq!(size_of::<TypeDesc>(), 2 * ptr);
        assert_eq!(size_of::<IdlDesc>(), 2 * ptr);
    }

    #[test]
    fn test_flags_and_guid() {
        let flags = TypeFlags::DUAL | TypeFlags::OLE_AUTOMATION;
        assert!(flags.contains(TypeFlags::DUAL));
        assert!(!flags.contains(TypeFlags::HIDDEN));

        let guid = Guid {
            data1: 0x0002_0400,
            data2: 0,
            data3: 0,
            data4: [0xc0, 0, 0, 0, 0, 0, 0, 0x46],
        };
        assert_eq!(guid.to_string(), "00020400-0000-0000-c000-000000000046");
    }
}
