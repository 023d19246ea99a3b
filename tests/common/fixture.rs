//! The fixture package `example.com/m`, one function per behaviour.

use decouple::core::ast::{BinaryOp, Expr, Stmt, UnaryOp};
use decouple::core::types::ChanDir;
use decouple::core::Corpus;
use decouple::testkit::fixtures::{CONTEXT, FMT, IO, OS};
use decouple::testkit::{stmt, CorpusBuilder, PackageBuilder, Stdlib};

pub const M: &str = "example.com/m";

pub fn corpus() -> Corpus {
    let mut corpus = CorpusBuilder::new();
    let std = Stdlib::install(&mut corpus);
    let mut pkg = corpus.package(M);
    pkg.import(CONTEXT).import(FMT).import(IO).import(OS);
    pkg.file("m/foo.go");

    readers(&mut pkg, std);
    conversions(&mut pkg, std);
    switches_and_channels(&mut pkg, std);
    comparisons_and_literals(&mut pkg, std);
    closures(&mut pkg, std);
    interface_params(&mut pkg, std);

    pkg.finish();
    corpus.root(M);
    corpus.build()
}

fn read_all(pb: &mut PackageBuilder<'_>, std: Stdlib, arg: Expr) -> Expr {
    let fun = pb.qualified(std.read_all);
    pb.call(fun, vec![arg])
}

fn nil_nil(pb: &mut PackageBuilder<'_>) -> Stmt {
    let a = pb.nil();
    let b = pb.nil();
    stmt::ret(vec![a, b])
}

fn readers(pkg: &mut PackageBuilder<'_>, std: Stdlib) {
    let read_results = [std.bytes, std.error];
    let make_bytes = pkg.types().signature(vec![std.bytes, std.int], vec![std.bytes], false);

    // if true { buf := make([]byte, n); n, err := r.Read(buf); return buf[:n], err }
    pkg.func("F1", &[("r", std.file_ptr), ("n", std.int)], &read_results, |pb, p| {
        let buf = pb.local("buf", std.bytes);
        let n = pb.local("n", std.int);
        let err = pb.local("err", std.error);

        let buf_def = pb.def(buf);
        let make = pb.ident_typed(std.make, make_bytes);
        let bytes_ty = pb.type_expr(std.bytes);
        let n_param = pb.ident(p[1]);
        let make_call = pb.call(make, vec![bytes_ty, n_param]);
        let define_buf = stmt::define(vec![buf_def], vec![make_call]);

        let n_def = pb.def(n);
        let err_def = pb.def(err);
        let r = pb.ident(p[0]);
        let read = pb.select(r, "Read");
        let buf_ref = pb.ident(buf);
        let read_call = pb.call(read, vec![buf_ref]);
        let define_n = stmt::define(vec![n_def, err_def], vec![read_call]);

        let buf_ref = pb.ident(buf);
        let n_ref = pb.ident(n);
        let head = pb.slice(buf_ref, None, Some(n_ref));
        let err_ref = pb.ident(err);
        let ret = stmt::ret(vec![head, err_ref]);

        let cond = pb.lit("true", std.bool);
        vec![
            stmt::if_then(cond, vec![define_buf, define_n, ret]),
            nil_nil(pb),
        ]
    });

    pkg.func("F2", &[("r", std.file_ptr)], &read_results, |pb, p| {
        let r = pb.ident(p[0]);
        vec![stmt::ret(vec![read_all(pb, std, r)])]
    });

    // b, err := io.ReadAll((lf)); return b, lf.N, err
    pkg.func(
        "F3",
        &[("lf", std.limited_reader_ptr)],
        &[std.bytes, std.int64, std.error],
        |pb, p| {
            let b = pb.local("b", std.bytes);
            let err = pb.local("err", std.error);
            let b_def = pb.def(b);
            let err_def = pb.def(err);
            let lf = pb.ident(p[0]);
            let lf = pb.paren(lf);
            let call = read_all(pb, std, lf);
            let define = stmt::define(vec![b_def, err_def], vec![call]);

            let b_ref = pb.ident(b);
            let lf = pb.ident(p[0]);
            let n = pb.select(lf, "N");
            let err_ref = pb.ident(err);
            vec![define, stmt::ret(vec![b_ref, n, err_ref])]
        },
    );

    // var f2 *os.File = f
    pkg.func("F4", &[("f", std.file_ptr)], &read_results, |pb, p| {
        let f2 = pb.local("f2", std.file_ptr);
        let f = pb.ident(p[0]);
        let decl = pb.var_decl(f2, Some(std.file_ptr), Some(f));
        let f2_ref = pb.ident(f2);
        vec![decl, stmt::ret(vec![read_all(pb, std, f2_ref)])]
    });

    // var f2 io.Reader = r
    pkg.func("F5", &[("r", std.file_ptr)], &read_results, |pb, p| {
        let f2 = pb.local("f2", std.reader);
        let r = pb.ident(p[0]);
        let decl = pb.var_decl(f2, Some(std.reader), Some(r));
        let f2_ref = pb.ident(f2);
        vec![decl, stmt::ret(vec![read_all(pb, std, f2_ref)])]
    });

    // defer rc.Close(); goto LABEL; LABEL: return io.ReadAll(rc)
    let f7 = pkg.func("F7", &[("rc", std.file_ptr)], &read_results, |pb, p| {
        let rc = pb.ident(p[0]);
        let close = pb.select(rc, "Close");
        let close_call = pb.call(close, vec![]);
        let goto = pb.goto("LABEL");
        let rc = pb.ident(p[0]);
        let ret = stmt::ret(vec![read_all(pb, std, rc)]);
        let labeled = pb.labeled("LABEL", ret);
        vec![stmt::defer(close_call), goto, labeled]
    });

    // return F7(f)
    pkg.func("F6", &[("f", std.file_ptr)], &read_results, |pb, p| {
        let fun = pb.ident(f7);
        let f = pb.ident(p[0]);
        vec![stmt::ret(vec![pb.call(fun, vec![f])])]
    });

    // var r2 io.Reader; r2 = r
    pkg.func("F10", &[("r", std.file_ptr)], &read_results, |pb, p| {
        let r2 = pb.local("r2", std.reader);
        let decl = pb.var_decl(r2, Some(std.reader), None);
        let r2_ref = pb.ident(r2);
        let r = pb.ident(p[0]);
        let assign = stmt::assign(vec![r2_ref], vec![r]);
        let r2_ref = pb.ident(r2);
        vec![decl, assign, stmt::ret(vec![read_all(pb, std, r2_ref)])]
    });
}

fn conversions(pkg: &mut PackageBuilder<'_>, std: Stdlib) {
    let read_results = [std.bytes, std.error];

    let int_erface = pkg.named("intErface", std.int);
    pkg.method(
        int_erface,
        false,
        "Read",
        &[("_", std.bytes)],
        &[std.int, std.error],
        |pb, _| {
            let zero = pb.int_lit(0);
            let nil = pb.nil();
            vec![stmt::ret(vec![zero, nil])]
        },
    );

    pkg.func("F8", &[("r", int_erface)], &read_results, |pb, p| {
        let r = pb.ident(p[0]);
        vec![stmt::ret(vec![read_all(pb, std, r)])]
    });

    // return int(i) + 1
    pkg.func("F9", &[("i", int_erface)], &[std.int], |pb, p| {
        let int_ty = pb.type_expr(std.int);
        let i = pb.ident(p[0]);
        let conv = pb.call(int_ty, vec![i]);
        let one = pb.int_lit(1);
        vec![stmt::ret(vec![pb.binary(BinaryOp::Add, conv, one)])]
    });

    let empty_sig = pkg.types().signature(vec![], vec![], false);
    let func_erface = pkg.named("funcErface", empty_sig);
    pkg.method(
        func_erface,
        false,
        "Read",
        &[("_", std.bytes)],
        &[std.int, std.error],
        |pb, _| {
            let zero = pb.int_lit(0);
            let nil = pb.nil();
            vec![stmt::ret(vec![zero, nil])]
        },
    );

    // f(); return io.ReadAll(f)
    pkg.func("F19", &[("f", func_erface)], &read_results, |pb, p| {
        let f = pb.ident(p[0]);
        let call = stmt::expr(pb.call(f, vec![]));
        let f = pb.ident(p[0]);
        vec![call, stmt::ret(vec![read_all(pb, std, f)])]
    });

    // return r.Read
    pkg.func("F20", &[("r", std.file_ptr)], &[std.read_sig], |pb, p| {
        let r = pb.ident(p[0]);
        vec![stmt::ret(vec![pb.select(r, "Read")])]
    });

    // return f
    pkg.func("F23", &[("f", std.file_ptr)], &[std.file_ptr], |pb, p| {
        vec![stmt::ret(vec![pb.ident(p[0])])]
    });

    // return rc
    pkg.func("F24", &[("rc", std.file_ptr)], &[std.read_closer], |pb, p| {
        vec![stmt::ret(vec![pb.ident(p[0])])]
    });

    // return x + 1
    pkg.func("F38", &[("x", std.int)], &[std.int], |pb, p| {
        let x = pb.ident(p[0]);
        let one = pb.int_lit(1);
        vec![stmt::ret(vec![pb.binary(BinaryOp::Add, x, one)])]
    });
}

fn switches_and_channels(pkg: &mut PackageBuilder<'_>, std: Stdlib) {
    let read_results = [std.bytes, std.error];

    // switch r { case r: return io.ReadAll(r); default: return nil, nil }
    pkg.func("F11", &[("r", std.file_ptr)], &read_results, |pb, p| {
        let tag = pb.ident(p[0]);
        let label = pb.ident(p[0]);
        let r = pb.ident(p[0]);
        let ret = stmt::ret(vec![read_all(pb, std, r)]);
        let default = nil_nil(pb);
        vec![stmt::switch(
            Some(tag),
            vec![stmt::case(vec![label], vec![ret]), stmt::case(vec![], vec![default])],
        )]
    });

    // var f2 os.File; switch f2 { case *f: ... }
    pkg.func("F12", &[("f", std.file_ptr)], &read_results, |pb, p| {
        let f2 = pb.local("f2", std.file);
        let decl = pb.var_decl(f2, Some(std.file), None);
        let tag = pb.ident(f2);
        let f = pb.ident(p[0]);
        let label = pb.star(f);
        let f = pb.ident(p[0]);
        let ret = stmt::ret(vec![read_all(pb, std, f)]);
        let default = nil_nil(pb);
        vec![
            decl,
            stmt::switch(
                Some(tag),
                vec![stmt::case(vec![label], vec![ret]), stmt::case(vec![], vec![default])],
            ),
        ]
    });

    // for { select { case <-ctx.Done(): return; case ch <- r: } }
    let reader_chan = pkg.types().chan(ChanDir::Send, std.reader);
    pkg.func(
        "F13",
        &[("ctx", std.context), ("ch", reader_chan), ("r", std.file_ptr)],
        &[],
        |pb, p| {
            let ctx = pb.ident(p[0]);
            let done = pb.select(ctx, "Done");
            let done_call = pb.call(done, vec![]);
            let recv = pb.unary(UnaryOp::Recv, done_call);
            let done_case = stmt::comm(Some(stmt::expr(recv)), vec![stmt::ret(vec![])]);

            let ch = pb.ident(p[1]);
            let r = pb.ident(p[2]);
            let send_case = stmt::comm(Some(stmt::send(ch, r)), vec![]);

            vec![stmt::forever(vec![stmt::select(vec![done_case, send_case])])]
        },
    );

    let bool_erface = pkg.named("boolErface", std.bool);
    pkg.method(
        bool_erface,
        false,
        "Read",
        &[("_", std.bytes)],
        &[std.int, std.error],
        |pb, _| {
            let zero = pb.int_lit(0);
            let nil = pb.nil();
            vec![stmt::ret(vec![zero, nil])]
        },
    );

    // switch { case bool(b): return io.ReadAll(b) ... }
    pkg.func("F15", &[("b", bool_erface)], &read_results, |pb, p| {
        let bool_ty = pb.type_expr(std.bool);
        let b = pb.ident(p[0]);
        let label = pb.call(bool_ty, vec![b]);
        let b = pb.ident(p[0]);
        let ret = stmt::ret(vec![read_all(pb, std, b)]);
        let default = nil_nil(pb);
        vec![stmt::switch(
            None,
            vec![stmt::case(vec![label], vec![ret]), stmt::case(vec![], vec![default])],
        )]
    });

    // switch { case true: if bool(b) { return io.ReadAll(b) } }
    pkg.func("F16", &[("b", bool_erface)], &read_results, |pb, p| {
        let label = pb.lit("true", std.bool);
        let bool_ty = pb.type_expr(std.bool);
        let b = pb.ident(p[0]);
        let cond = pb.call(bool_ty, vec![b]);
        let b = pb.ident(p[0]);
        let ret = stmt::ret(vec![read_all(pb, std, b)]);
        let if_stmt = stmt::if_then(cond, vec![ret]);
        vec![
            stmt::switch(None, vec![stmt::case(vec![label], vec![if_stmt])]),
            nil_nil(pb),
        ]
    });

    // r := <-ch; return io.ReadAll(r)
    let file_recv = pkg.types().chan(ChanDir::Recv, std.file_ptr);
    pkg.func("F33", &[("ch", file_recv)], &read_results, |pb, p| {
        let r = pb.local("r", std.file_ptr);
        let r_def = pb.def(r);
        let ch = pb.ident(p[0]);
        let recv = pb.unary(UnaryOp::Recv, ch);
        let define = stmt::define(vec![r_def], vec![recv]);
        let r_ref = pb.ident(r);
        vec![define, stmt::ret(vec![read_all(pb, std, r_ref)])]
    });

    // ch <- r; return io.ReadAll(r)
    let file_send = pkg.types().chan(ChanDir::Send, std.file_ptr);
    pkg.func(
        "F34",
        &[("r", std.file_ptr), ("ch", file_send)],
        &read_results,
        |pb, p| {
            let ch = pb.ident(p[1]);
            let r = pb.ident(p[0]);
            let send = stmt::send(ch, r);
            let r = pb.ident(p[0]);
            vec![send, stmt::ret(vec![read_all(pb, std, r)])]
        },
    );
}

fn comparisons_and_literals(pkg: &mut PackageBuilder<'_>, std: Stdlib) {
    let read_results = [std.bytes, std.error];

    // []io.Reader{r}
    let readers = pkg.types().slice(std.reader);
    pkg.func("F14", &[("r", std.file_ptr)], &[readers], |pb, p| {
        let r = pb.ident(p[0]);
        vec![stmt::ret(vec![pb.composite(readers, vec![stmt::elem(r)])])]
    });

    // var x io.Reader; if r == x {...}  and the mirrored x == r
    for (name, param_first) in [("F17", true), ("F17b", false)] {
        pkg.func(name, &[("r", std.file_ptr)], &read_results, |pb, p| {
            let x = pb.local("x", std.reader);
            let decl = pb.var_decl(x, Some(std.reader), None);
            let r = pb.ident(p[0]);
            let x_ref = pb.ident(x);
            let cond = if param_first {
                pb.binary(BinaryOp::Eql, r, x_ref)
            } else {
                pb.binary(BinaryOp::Eql, x_ref, r)
            };
            let early = nil_nil(pb);
            let r = pb.ident(p[0]);
            vec![
                decl,
                stmt::if_then(cond, vec![early]),
                stmt::ret(vec![read_all(pb, std, r)]),
            ]
        });
    }

    // if f == nil {...}
    pkg.func("F18", &[("f", std.file_ptr)], &read_results, |pb, p| {
        let f = pb.ident(p[0]);
        let nil = pb.nil();
        let cond = pb.binary(BinaryOp::Eql, f, nil);
        let early = nil_nil(pb);
        let f = pb.ident(p[0]);
        vec![
            stmt::if_then(cond, vec![early]),
            stmt::ret(vec![read_all(pb, std, f)]),
        ]
    });

    // map[*os.File]int{f: 0}
    let by_file = pkg.types().map(std.file_ptr, std.int);
    pkg.func("F21", &[("f", std.file_ptr)], &[by_file], |pb, p| {
        let f = pb.ident(p[0]);
        let zero = pb.int_lit(0);
        vec![stmt::ret(vec![pb.composite(by_file, vec![stmt::kv(f, zero)])])]
    });

    // map[io.ReadCloser]int{rc: 0}
    let by_read_closer = pkg.types().map(std.read_closer, std.int);
    pkg.func("F22", &[("rc", std.file_ptr)], &[by_read_closer], |pb, p| {
        let rc = pb.ident(p[0]);
        let zero = pb.int_lit(0);
        vec![stmt::ret(vec![pb.composite(by_read_closer, vec![stmt::kv(rc, zero)])])]
    });

    // map[int]io.Reader{7: r}
    let reader_by_int = pkg.types().map(std.int, std.reader);
    pkg.func("F28", &[("r", std.file_ptr)], &[reader_by_int], |pb, p| {
        let seven = pb.int_lit(7);
        let r = pb.ident(p[0]);
        vec![stmt::ret(vec![pb.composite(reader_by_int, vec![stmt::kv(seven, r)])])]
    });

    // x := []io.Reader{r}; return x[0]
    pkg.func("F31", &[("r", std.file_ptr)], &[std.reader], |pb, p| {
        let x = pb.local("x", readers);
        let x_def = pb.def(x);
        let r = pb.ident(p[0]);
        let lit = pb.composite(readers, vec![stmt::elem(r)]);
        let define = stmt::define(vec![x_def], vec![lit]);
        let x_ref = pb.ident(x);
        let zero = pb.int_lit(0);
        vec![define, stmt::ret(vec![pb.index(x_ref, zero)])]
    });
}

fn closures(pkg: &mut PackageBuilder<'_>, std: Stdlib) {
    let read_results = [std.bytes, std.error];

    // return func() ([]byte, error) { return io.ReadAll(r) }()
    pkg.func("F25", &[("r", std.file_ptr)], &read_results, |pb, p| {
        let r = pb.ident(p[0]);
        let inner = stmt::ret(vec![read_all(pb, std, r)]);
        let lit = pb.func_lit(&read_results, vec![inner]);
        vec![stmt::ret(vec![pb.call(lit, vec![])])]
    });

    // return func() *os.File { return f }()
    pkg.func("F26", &[("f", std.file_ptr)], &[std.reader], |pb, p| {
        let f = pb.ident(p[0]);
        let lit = pb.func_lit(&[std.file_ptr], vec![stmt::ret(vec![f])]);
        vec![stmt::ret(vec![pb.call(lit, vec![])])]
    });

    // ch := make(chan struct{}); go func() { data, err = io.ReadAll(r); close(ch) }(); <-ch; return
    let done = pkg.types().chan(ChanDir::Both, std.empty_struct);
    let make_done = pkg.types().signature(vec![done], vec![done], false);
    let close_done = pkg.types().signature(vec![done], vec![], false);
    pkg.func("F27", &[("r", std.file_ptr)], &read_results, |pb, p| {
        let data = pb.local("data", std.bytes);
        let err = pb.local("err", std.error);
        let ch = pb.local("ch", done);

        let ch_def = pb.def(ch);
        let make = pb.ident_typed(std.make, make_done);
        let chan_ty = pb.type_expr(done);
        let make_call = pb.call(make, vec![chan_ty]);
        let define = stmt::define(vec![ch_def], vec![make_call]);

        let data_ref = pb.ident(data);
        let err_ref = pb.ident(err);
        let r = pb.ident(p[0]);
        let read = read_all(pb, std, r);
        let assign = stmt::assign(vec![data_ref, err_ref], vec![read]);
        let close = pb.ident_typed(std.close, close_done);
        let ch_ref = pb.ident(ch);
        let close_call = stmt::expr(pb.call(close, vec![ch_ref]));
        let lit = pb.func_lit(&[], vec![assign, close_call]);
        let go = stmt::go(pb.call(lit, vec![]));

        let ch_ref = pb.ident(ch);
        let wait = stmt::expr(pb.unary(UnaryOp::Recv, ch_ref));
        vec![define, go, wait, stmt::ret(vec![])]
    });
}

fn interface_params(pkg: &mut PackageBuilder<'_>, std: Stdlib) {
    let read_results = [std.bytes, std.error];

    // r io.ReadCloser used only as a reader
    pkg.func("F29", &[("r", std.read_closer)], &read_results, |pb, p| {
        let r = pb.ident(p[0]);
        vec![stmt::ret(vec![read_all(pb, std, r)])]
    });

    // x io.ReadCloser needs both methods
    pkg.func("F30", &[("x", std.read_closer)], &read_results, |pb, p| {
        let x = pb.ident(p[0]);
        let close = pb.select(x, "Close");
        let close_call = pb.call(close, vec![]);
        let x = pb.ident(p[0]);
        vec![
            stmt::defer(close_call),
            stmt::ret(vec![read_all(pb, std, x)]),
        ]
    });

    pkg.func("F32", &[("_", std.reader)], &[], |_, _| vec![]);

    // x interface { foo(); bar() } calling only foo
    let unit = pkg.types().signature(vec![], vec![], false);
    let foo_bar = pkg.types().interface(&[("foo", unit), ("bar", unit)]);
    pkg.func("F35", &[("x", foo_bar)], &[], |pb, p| {
        let x = pb.ident(p[0]);
        let foo = pb.select(x, "foo");
        vec![stmt::expr(pb.call(foo, vec![]))]
    });

    // for _, inp := range inps { if _, err := io.Copy(w, inp); err != nil { return err } }
    let files = pkg.types().slice(std.file_ptr);
    pkg.func(
        "F36",
        &[("w", std.writer), ("inps", files)],
        &[std.error],
        |pb, p| {
            let inp = pb.local("inp", std.file_ptr);
            let err = pb.local("err", std.error);

            let blank = pb.blank();
            let err_def = pb.def(err);
            let copy = pb.qualified(std.copy);
            let w = pb.ident(p[0]);
            let inp_ref = pb.ident(inp);
            let copy_call = pb.call(copy, vec![w, inp_ref]);
            let init = stmt::define(vec![blank, err_def], vec![copy_call]);
            let err_ref = pb.ident(err);
            let nil = pb.nil();
            let cond = pb.binary(BinaryOp::Neq, err_ref, nil);
            let err_ref = pb.ident(err);
            let check = stmt::if_init(init, cond, vec![stmt::ret(vec![err_ref])]);

            let key = pb.blank();
            let inp_def = pb.def(inp);
            let inps = pb.ident(p[1]);
            let nil = pb.nil();
            vec![
                stmt::range(Some(key), Some(inp_def), inps, vec![check]),
                stmt::ret(vec![nil]),
            ]
        },
    );

    // switch r := r.(type) { case *os.File: fmt.Println(r.Name()) }
    pkg.func("F37", &[("r", std.reader)], &read_results, |pb, p| {
        let inner = pb.local("r", std.file_ptr);
        let inner_def = pb.def(inner);
        let r = pb.ident(p[0]);
        let guard = pb.type_assert(r, None);
        let assign = stmt::define(vec![inner_def], vec![guard]);

        let println = pb.qualified(std.println);
        let inner_ref = pb.ident(inner);
        let name = pb.select(inner_ref, "Name");
        let name_call = pb.call(name, vec![]);
        let print = stmt::expr(pb.call(println, vec![name_call]));
        let file_ty = pb.type_expr(std.file_ptr);

        let r = pb.ident(p[0]);
        vec![
            stmt::type_switch(assign, vec![stmt::type_case(vec![file_ty], vec![print])]),
            stmt::ret(vec![read_all(pb, std, r)]),
        ]
    });
}
