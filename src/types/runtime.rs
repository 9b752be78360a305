use crate::{
    cache::MemberEnumerator,
    error::ReflectionError,
    types::{
        members::{EventDescription, FieldDescription, MethodDescription, PropertyDescription},
        TypeDescription,
    },
};

/// A type as reflection sees it.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RuntimeTypeInfo {
    Named(TypeDescription),
    GenericInstance(TypeDescription, Vec<RuntimeTypeInfo>),
    Vector(Box<RuntimeTypeInfo>),
    Array(Box<RuntimeTypeInfo>, u32),
    Pointer(Box<RuntimeTypeInfo>),
    ByRef(Box<RuntimeTypeInfo>),
    TypeParameter { owner: TypeDescription, index: u16 },
}

impl RuntimeTypeInfo {
    pub fn name(&self) -> String {
        match self {
            RuntimeTypeInfo::Named(td) => td.definition().name.to_string(),
            RuntimeTypeInfo::GenericInstance(td, args) => {
                let args: Vec<_> = args.iter().map(|a| a.name()).collect();
                format!("{}[{}]", td.definition().name, args.join(","))
            }
            RuntimeTypeInfo::Vector(t) => format!("{}[]", t.name()),
            RuntimeTypeInfo::Array(t, rank) => {
                let commas = if *rank > 1 {
                    ",".repeat(*rank as usize - 1)
                } else {
                    "".to_string()
                };
                format!("{}[{}]", t.name(), commas)
            }
            RuntimeTypeInfo::Pointer(t) => format!("{}*", t.name()),
            RuntimeTypeInfo::ByRef(t) => format!("{}&", t.name()),
            RuntimeTypeInfo::TypeParameter { owner, index } => owner
                .generic_parameter_name(*index)
                .map(str::to_string)
                .unwrap_or_else(|| format!("!{}", index)),
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            RuntimeTypeInfo::Named(td) => td.type_name(),
            RuntimeTypeInfo::GenericInstance(td, args) => {
                let args: Vec<_> = args.iter().map(|a| a.full_name()).collect();
                format!("{}[{}]", td.type_name(), args.join(","))
            }
            _ => self.name(),
        }
    }
}

impl From<TypeDescription> for RuntimeTypeInfo {
    fn from(td: TypeDescription) -> Self {
        RuntimeTypeInfo::Named(td)
    }
}

impl MemberEnumerator for RuntimeTypeInfo {
    type Definition = TypeDescription;
    type Method = MethodDescription;
    type Field = FieldDescription;
    type Property = PropertyDescription;
    type Event = EventDescription;

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn anchoring_type_definition(&self) -> Option<TypeDescription> {
        match self {
            RuntimeTypeInfo::Named(td) | RuntimeTypeInfo::GenericInstance(td, _) => Some(*td),
            RuntimeTypeInfo::Vector(_)
            | RuntimeTypeInfo::Array(_, _)
            | RuntimeTypeInfo::Pointer(_)
            | RuntimeTypeInfo::ByRef(_)
            | RuntimeTypeInfo::TypeParameter { .. } => None,
        }
    }

    fn declared_methods(
        &self,
        definition: &TypeDescription,
    ) -> Result<impl Iterator<Item = MethodDescription>, ReflectionError> {
        let parent = *definition;
        Ok(parent
            .definition()
            .methods
            .iter()
            .map(move |method| MethodDescription { parent, method }))
    }

    fn declared_fields(
        &self,
        definition: &TypeDescription,
    ) -> Result<impl Iterator<Item = FieldDescription>, ReflectionError> {
        let parent = *definition;
        Ok(parent
            .definition()
            .fields
            .iter()
            .map(move |field| FieldDescription { parent, field }))
    }

    fn declared_properties(
        &self,
        definition: &TypeDescription,
    ) -> Result<impl Iterator<Item = PropertyDescription>, ReflectionError> {
        let parent = *definition;
        Ok(parent
            .definition()
            .properties
            .iter()
            .map(move |property| PropertyDescription { parent, property }))
    }

    fn declared_events(
        &self,
        definition: &TypeDescription,
    ) -> Result<impl Iterator<Item = EventDescription>, ReflectionError> {
        let parent = *definition;
        Ok(parent
            .definition()
            .events
            .iter()
            .map(move |event| EventDescription { parent, event }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{DeclaredMemberCache, MemberInfo, MemberKind},
        types::test_assembly,
    };

    fn demo_type(name: &str) -> RuntimeTypeInfo {
        RuntimeTypeInfo::from(test_assembly::load().find_type(name).unwrap())
    }

    #[test]
    fn test_overloads_fields_and_absence() {
        let cache = DeclaredMemberCache::new(demo_type("Demo.Widget"));

        let err = cache.get_declared_method("Foo").unwrap_err();
        assert_eq!(
            err,
            ReflectionError::AmbiguousMember {
                kind: MemberKind::Method,
                type_name: "Demo.Widget".to_string(),
                name: "Foo".to_string(),
            }
        );
        // ambiguity is reported again rather than remembered
        assert!(cache.get_declared_method("Foo").is_err());

        let bar = cache.get_declared_field("Bar").unwrap().unwrap();
        assert_eq!(bar.name(), "Bar");
        assert_eq!(bar.kind(), MemberKind::Field);
        assert_eq!(cache.get_declared_property("Bar"), Ok(None));
        assert_eq!(cache.get_declared_method("Bar"), Ok(None));
        assert_eq!(cache.get_declared_field("bar"), Ok(None));
    }

    #[test]
    fn test_properties_and_events() {
        let cache = DeclaredMemberCache::new(demo_type("Demo.Widget"));
        let size = cache.get_declared_property("Size").unwrap().unwrap();
        let changed = cache.get_declared_event("Changed").unwrap().unwrap();
        assert_eq!(size.kind(), MemberKind::Property);
        assert_eq!(changed.kind(), MemberKind::Event);
        assert_eq!(cache.get_declared_event("Changed"), Ok(Some(changed)));
        // accessors are methods of the property or event, not of the type
        assert_eq!(cache.get_declared_method("add_Changed"), Ok(None));
        assert_eq!(cache.stats().events.hits, 1);
    }

    #[test]
    fn test_nested_type_declares_its_own_members() {
        let cache = DeclaredMemberCache::new(demo_type("Demo.Widget/Part"));
        let foo = cache.get_declared_method("Foo").unwrap().unwrap();
        assert_eq!(foo.parent.type_name(), "Demo.Widget/Part");
        assert_eq!(cache.get_declared_field("Bar"), Ok(None));
    }

    #[test]
    fn test_member_debug_output() {
        let widget = DeclaredMemberCache::new(demo_type("Demo.Widget"));
        let part = DeclaredMemberCache::new(demo_type("Demo.Widget/Part"));
        let foo = part.get_declared_method("Foo").unwrap().unwrap();
        let bar = widget.get_declared_field("Bar").unwrap().unwrap();
        let size = widget.get_declared_property("Size").unwrap().unwrap();
        let changed = widget.get_declared_event("Changed").unwrap().unwrap();

        assert_eq!(format!("{:?}", foo), "void Demo.Widget/Part::Foo()");
        assert_eq!(format!("{:?}", bar), "int Demo.Widget::Bar");
        assert_eq!(format!("{:?}", size), "property Demo.Widget::Size");
        assert_eq!(format!("{:?}", changed), "event Demo.Widget::Changed");
    }

    #[test]
    fn test_generic_instance_anchors_to_definition() {
        let bag = demo_type("Demo.Bag`1");
        let RuntimeTypeInfo::Named(definition) = bag.clone() else {
            unreachable!()
        };
        let instance =
            RuntimeTypeInfo::GenericInstance(definition, vec![demo_type("Demo.Widget")]);
        assert_eq!(instance.anchoring_type_definition(), Some(definition));
        assert_eq!(instance.name(), "Bag`1[Widget]");
        assert_eq!(instance.full_name(), "Demo.Bag`1[Demo.Widget]");

        let from_instance = DeclaredMemberCache::new(instance);
        let from_definition = DeclaredMemberCache::new(bag);
        let item = from_instance.get_declared_field("Item").unwrap().unwrap();
        assert_eq!(item.parent, definition);
        assert_eq!(Some(item), from_definition.get_declared_field("Item").unwrap());
        assert_eq!(
            from_instance.get_declared_property("Count"),
            from_definition.get_declared_property("Count")
        );
    }

    #[test]
    fn test_constructed_types_declare_nothing() {
        let widget = demo_type("Demo.Widget");
        let RuntimeTypeInfo::Named(owner) = demo_type("Demo.Bag`1") else {
            unreachable!()
        };
        let constructed = [
            (RuntimeTypeInfo::Vector(Box::new(widget.clone())), "Widget[]"),
            (RuntimeTypeInfo::Array(Box::new(widget.clone()), 2), "Widget[,]"),
            (RuntimeTypeInfo::Pointer(Box::new(widget.clone())), "Widget*"),
            (RuntimeTypeInfo::ByRef(Box::new(widget)), "Widget&"),
            (RuntimeTypeInfo::TypeParameter { owner, index: 0 }, "T"),
        ];
        for (ty, name) in constructed {
            assert_eq!(ty.name(), name);
            assert_eq!(ty.anchoring_type_definition(), None);
            let cache = DeclaredMemberCache::new(ty);
            assert_eq!(cache.get_declared_field("Bar"), Ok(None));
            assert_eq!(cache.get_declared_event("Changed"), Ok(None));
        }
    }
}
