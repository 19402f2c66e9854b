use std::io;

error_chain! {
    foreign_links {
        Io(io::Error);
    }

    errors {
        ParseError(line: usize, text: String) {
            description("malformed polygon data")
            display("malformed polygon data on line {}: {}", line, text)
        }
        UnknownOperation(name: String) {
            description("unknown boolean operation")
            display("unknown boolean operation: {} (expected intersection, union, difference, or xor)", name)
        }
    }
}
