//! An in-memory `Demo` assembly for tests that need real metadata.
//!
//! ```text
//! namespace Demo {
//!     class Widget {
//!         static void Foo();
//!         static void Foo(int);
//!         int Bar;
//!         int Size { get; }
//!         event object Changed;
//!         class Part { void Foo(); }
//!     }
//!     class Bag<T> {
//!         T Item;
//!         int Count { get; }
//!     }
//! }
//! ```
use crate::resolution::ResolutionS;
use dotnetdll::prelude::*;
use std::sync::OnceLock;

fn int32() -> MemberType {
    MemberType::Base(Box::new(BaseType::Int32))
}

fn object_parameter() -> Parameter<MethodType> {
    Parameter::value(MethodType::Base(Box::new(BaseType::Object)))
}

fn accessor(
    name: &'static str,
    instance: bool,
    parameters: Vec<Parameter<MethodType>>,
) -> Method<'static> {
    Method::new(
        Accessibility::Public,
        ManagedMethod::new(instance, ReturnType::VOID, parameters),
        name,
        None,
    )
}

fn build() -> Resolution<'static> {
    let mut res = Resolution::new(Module::new("Demo.dll"));
    res.assembly = Some(Assembly::new("Demo"));

    let widget = res.push_type_definition(TypeDefinition::new(Some("Demo".into()), "Widget"));
    res.push_method(widget, accessor("Foo", false, vec![]));
    res.push_method(
        widget,
        accessor(
            "Foo",
            false,
            vec![Parameter::value(MethodType::Base(Box::new(BaseType::Int32)))],
        ),
    );
    res.push_field(widget, Field::new(false, Accessibility::Public, "Bar", int32()));
    res.push_property(widget, Property::new(false, "Size", Parameter::value(int32())));
    res.push_event(
        widget,
        Event::new(
            "Changed",
            MemberType::Base(Box::new(BaseType::Object)),
            accessor("add_Changed", true, vec![object_parameter()]),
            accessor("remove_Changed", true, vec![object_parameter()]),
        ),
    );

    let mut part = TypeDefinition::new(None, "Part");
    part.encloser = Some(widget);
    let part = res.push_type_definition(part);
    res.push_method(part, accessor("Foo", true, vec![]));

    let mut bag = TypeDefinition::new(Some("Demo".into()), "Bag`1");
    bag.generic_parameters.push(generic::Type::new("T"));
    let bag = res.push_type_definition(bag);
    res.push_field(
        bag,
        Field::new(false, Accessibility::Public, "Item", MemberType::TypeGeneric(0)),
    );
    res.push_property(bag, Property::new(false, "Count", Parameter::value(int32())));

    res
}

/// The `Demo` assembly, built and leaked once per test binary.
pub(crate) fn load() -> ResolutionS {
    static DEMO: OnceLock<ResolutionS> = OnceLock::new();
    *DEMO.get_or_init(|| ResolutionS::new(Box::leak(Box::new(build()))))
}
