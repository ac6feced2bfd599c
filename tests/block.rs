#[macro_use]
mod common;

#[cfg(test)]
mod block {
    #[test]
    fn empty_block_runs_without_effect() {
        assert_prints!("{ } print \"ok\";", "ok");
    }

    #[test]
    fn inner_scope_shadows_outer() {
        assert_prints!(
            "var a = \"outer\"; { var a = \"inner\"; print a; } print a;",
            "inner",
            "outer"
        );
    }

    #[test]
    fn nested_blocks_see_enclosing_scopes() {
        assert_prints!(
            "var a = \"a\"; { var b = \"b\"; { var c = \"c\"; print a; print b; print c; } }",
            "a",
            "b",
            "c"
        );
    }
}
