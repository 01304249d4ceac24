use std::io;

use banchess::Engine;

fn main() -> anyhow::Result<()> {
    banchess::print_engine_info();
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut engine = Engine::new(&mut input, &mut output);
    engine.uci_loop()
}
