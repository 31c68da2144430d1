use crate::mach::{Config, Event, Runtime};


fn run(runtime: &mut Runtime) -> String {
    run_cycles(runtime, 5000)
}

fn run_cycles(runtime: &mut Runtime, cycles: usize) -> String {
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

fn small_stack(stack_max: usize) -> Runtime {
    Runtime::new(Config {
        stack_max,
        ..Config::default()
    })
}
