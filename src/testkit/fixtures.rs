//! A miniature standard library shared by tests.
//!
//! [`Stdlib::install`] declares the handful of packages the scenario tests
//! rely on: `io` with its reader/writer/closer family, `os.File`,
//! `context.Context`, `fmt.Println`, and an `internal/poll` package whose
//! exported interface must never be suggested.

use crate::core::oracle::ObjectId;
use crate::core::types::{BasicKind, ChanDir, TypeId};
use crate::testkit::builder::CorpusBuilder;

pub const IO: &str = "io";
pub const OS: &str = "os";
pub const CONTEXT: &str = "context";
pub const FMT: &str = "fmt";
pub const POLL: &str = "internal/poll";

/// Types and objects declared by [`Stdlib::install`]
#[derive(Debug, Clone, Copy)]
pub struct Stdlib {
    pub bool: TypeId,
    pub int: TypeId,
    pub int64: TypeId,
    pub string: TypeId,
    pub bytes: TypeId,
    pub error: TypeId,
    /// `interface{}`
    pub any: TypeId,
    pub empty_struct: TypeId,

    /// `func([]byte) (int, error)`
    pub read_sig: TypeId,
    pub write_sig: TypeId,
    /// `func() error`
    pub close_sig: TypeId,

    pub reader: TypeId,
    pub writer: TypeId,
    pub closer: TypeId,
    pub read_closer: TypeId,
    pub read_writer: TypeId,
    pub write_closer: TypeId,
    pub read_write_closer: TypeId,

    /// `os.File`, a struct whose methods all have pointer receivers
    pub file: TypeId,
    pub file_ptr: TypeId,
    /// `io.LimitedReader` with fields `R` and `N`
    pub limited_reader: TypeId,
    pub limited_reader_ptr: TypeId,

    pub context: TypeId,
    /// `<-chan struct{}`
    pub done_chan: TypeId,

    pub read_all: ObjectId,
    pub copy: ObjectId,
    pub println: ObjectId,

    pub make: ObjectId,
    pub close: ObjectId,
}

impl Stdlib {
    pub fn install(corpus: &mut CorpusBuilder) -> Self {
        let types = corpus.types();
        let bool = types.basic(BasicKind::Bool);
        let int = types.basic(BasicKind::Int);
        let int64 = types.basic(BasicKind::Int64);
        let string = types.basic(BasicKind::String);
        let byte = types.basic(BasicKind::Byte);
        let bytes = types.slice(byte);
        let error = types.error();
        let any = types.interface(&[]);
        let empty_struct = types.struct_type(&[]);

        let read_sig = types.signature(vec![bytes], vec![int, error], false);
        let write_sig = types.signature(vec![bytes], vec![int, error], false);
        let close_sig = types.signature(vec![], vec![error], false);
        let name_sig = types.signature(vec![], vec![string], false);
        let done_chan = types.chan(ChanDir::Recv, empty_struct);
        let done_sig = types.signature(vec![], vec![done_chan], false);
        let err_sig = types.signature(vec![], vec![error], false);
        let value_sig = types.signature(vec![any], vec![any], false);

        let mut io = corpus.package(IO);
        let reader = io.interface("Reader", &[("Read", read_sig)]);
        let writer = io.interface("Writer", &[("Write", write_sig)]);
        let closer = io.interface("Closer", &[("Close", close_sig)]);
        let read_closer = io.interface("ReadCloser", &[("Read", read_sig), ("Close", close_sig)]);
        let read_writer = io.interface("ReadWriter", &[("Read", read_sig), ("Write", write_sig)]);
        let write_closer =
            io.interface("WriteCloser", &[("Write", write_sig), ("Close", close_sig)]);
        let read_write_closer = io.interface(
            "ReadWriteCloser",
            &[("Read", read_sig), ("Write", write_sig), ("Close", close_sig)],
        );
        let limited = io.types().struct_type(&[("R", reader), ("N", int64)]);
        let limited_reader = io.named("LimitedReader", limited);
        io.types().add_method(limited_reader, "Read", read_sig, true);
        let limited_reader_ptr = io.types().pointer(limited_reader);

        let read_all_sig = io.types().signature(vec![reader], vec![bytes, error], false);
        let read_all = io.declare_func("ReadAll", read_all_sig);
        let copy_sig = io.types().signature(vec![writer, reader], vec![int64, error], false);
        let copy = io.declare_func("Copy", copy_sig);
        io.finish();

        let mut poll = corpus.package(POLL);
        poll.interface("Reader", &[("Read", read_sig)]);
        poll.interface("fd", &[("Close", close_sig)]);
        poll.finish();

        let mut os = corpus.package(OS);
        os.import(IO).import(POLL);
        let file_struct = os.types().struct_type(&[("name", string)]);
        let file = os.named("File", file_struct);
        for (name, sig) in [
            ("Read", read_sig),
            ("Write", write_sig),
            ("Close", close_sig),
            ("Name", name_sig),
        ] {
            os.types().add_method(file, name, sig, true);
        }
        let file_ptr = os.types().pointer(file);
        os.finish();

        let mut context = corpus.package(CONTEXT);
        let ctx = context.interface(
            "Context",
            &[("Done", done_sig), ("Err", err_sig), ("Value", value_sig)],
        );
        context.finish();

        let mut fmt = corpus.package(FMT);
        fmt.import(IO).import(OS);
        let anys = fmt.types().slice(any);
        let println_sig = fmt.types().signature(vec![anys], vec![int, error], true);
        let println = fmt.declare_func("Println", println_sig);
        let stringer_sig = fmt.types().signature(vec![], vec![string], false);
        fmt.interface("Stringer", &[("String", stringer_sig)]);
        fmt.finish();

        let make = corpus.builtin("make");
        let close = corpus.builtin("close");

        Self {
            bool,
            int,
            int64,
            string,
            bytes,
            error,
            any,
            empty_struct,
            read_sig,
            write_sig,
            close_sig,
            reader,
            writer,
            closer,
            read_closer,
            read_writer,
            write_closer,
            read_write_closer,
            file,
            file_ptr,
            limited_reader,
            limited_reader_ptr,
            context: ctx,
            done_chan,
            read_all,
            copy,
            println,
            make,
            close,
        }
    }
}
