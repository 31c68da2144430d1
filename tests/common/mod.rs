use lox::mach::{Event, Runtime};

pub fn exec(runtime: &mut Runtime) -> String {
    exec_n(runtime, 5000)
}

#[allow(dead_code)]
pub fn exec_n(runtime: &mut Runtime, cycles: usize) -> String {
    let mut s = String::new();
    loop {
        match runtime.execute(cycles) {
            Event::Stopped => break,
            Event::Running => {}
            Event::Print(ps) => s.push_str(&ps),
            Event::Errors(errors) => {
                for error in errors.iter() {
                    s.push_str(&format!("{}\n", error));
                }
            }
        }
    }
    s
}

#[allow(dead_code)]
pub fn lox(source: &str) -> String {
    let mut r = Runtime::default();
    r.enter(source);
    exec(&mut r)
}
