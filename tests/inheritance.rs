#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    #[test]
    fn a_subclass_inherits_a_method_it_does_not_override() {
        assert_prints!(
            "class A { foo() { return \"foo\"; } bar() { return \"bar\"; } }
             class B < A {}
             var b = B();
             print b.foo();
             print b.bar();",
            "foo",
            "bar"
        );
    }

    #[test]
    fn a_subclass_initializer_can_set_fields_used_by_an_inherited_method() {
        assert_prints!(
            "class A { init(x) { this.x = x; } getX() { return this.x; } }
             class B < A {}
             print B(\"value\").getX();",
            "value"
        );
    }

    #[test]
    fn inherited_methods_see_fields_set_from_the_base_class_constructor() {
        assert_prints!(
            "class A { init(a, b) { this.a = a; this.b = b; } foo() { return \"foo \" + this.a; } bar() { return \"bar \" + this.b; } }
             class B < A {}
             var b1 = B(1, 2);
             print b1.foo();
             print b1.bar();",
            "foo 1",
            "bar 2"
        );
    }

    #[test]
    fn inheriting_from_a_non_class_value_is_a_runtime_error() {
        assert_errors!(
            "inherit_from_function",
            "fun NotAClass() {}
             class Subclass < NotAClass {}"
        );
    }

    #[test]
    fn inheriting_from_a_number_is_a_runtime_error() {
        assert_errors!("inherit_from_number", "var NotAClass = 1; class Foo < NotAClass {}");
    }

    #[test]
    fn a_parenthesized_superclass_name_is_a_static_error() {
        assert_errors!(
            "parenthesized_superclass",
            "class Foo {}
             class Bar < (Foo) {}"
        );
    }

    #[test]
    fn static_members_are_not_inherited() {
        assert_errors!(
            "static_not_inherited",
            "class A { static method() { return \"A.method\"; } }
             class B < A {}
             print B.method();"
        );
    }
}
