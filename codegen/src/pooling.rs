//! `release_x`/`x_pool` emission shared by every engine.
//!
//! The rewrite does not mandate pooling (see the design notes on pool
//! allocator symbols); these are optimization hooks downstream code may
//! bind to, not something either engine's decode path calls into itself.

use std::fmt::Write as _;

pub fn emit_release_and_pool(ty: &str, base: &str, out: &mut String) {
    writeln!(
        out,
        "/// Optimization hook: callers may return a `{ty}` to `{base}_pool()` and \
         `release_{base}` may later hand it back out. Pooling is not performed here."
    )
    .unwrap();
    writeln!(out, "pub fn release_{base}(_value: {ty}) {{}}\n").unwrap();

    writeln!(out, "#[derive(Default)]").unwrap();
    writeln!(out, "pub struct {ty}Pool {{ free: Vec<{ty}> }}\n").unwrap();
    writeln!(out, "impl {ty}Pool {{").unwrap();
    writeln!(out, "    pub fn get(&mut self) -> {ty} {{").unwrap();
    writeln!(out, "        self.free.pop().unwrap_or_default()").unwrap();
    writeln!(out, "    }}\n").unwrap();
    writeln!(out, "    pub fn put(&mut self, value: {ty}) {{").unwrap();
    writeln!(out, "        self.free.push(value);").unwrap();
    writeln!(out, "    }}").unwrap();
    writeln!(out, "}}\n").unwrap();

    writeln!(out, "pub fn {base}_pool() -> {ty}Pool {{ {ty}Pool::default() }}").unwrap();
}
