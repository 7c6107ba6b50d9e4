//! The built-in tree the terminal boots with.

use phosphor_types::VfsPath;

use super::node::Node;

const MOTD: &str = "\
PHOSPHOR TERMINAL SERVICES
Authorized operators only. All sessions are logged.
Type 'help' for local commands. Anything else is relayed upstream.";

const README: &str = "\
Welcome back, operator.

Local commands run against this terminal's archive:
  ls [path]    list a directory
  cd [path]    change directory (no argument returns home)
  cat <path>   print a file
  pwd          print the working directory
  whoami       print your handle

Everything else is transmitted to the relay and the reply is typed back
to you as it arrives.";

const MANIFESTO: &str = "\
We kept the green screens because they never lied about being machines.
Every character arrives one at a time. Nothing is instant. Nothing is free.";

const MISSION_LOG: &str = "\
# Mission log

- **0400** relay handshake nominal
- **0412** upstream latency spiking, typewriter buffer holding
- **0431** backlog drained, all channels quiet";

const RELAY_NOTES: &str = "\
The relay speaks in two modes:
  operator  terse, procedural, answers first
  oracle    oblique, fond of riddles

Switch with `mode oracle` or `mode operator`.";

const SYSLOG: &str = "\
[000.000] phosphor: cold boot
[000.020] vfs: archive mounted read-only
[000.021] relay: link established
[000.022] tty0: typewriter pacing 20ms";

/// Build the default archive, with the home directory at `home`.
pub fn default_tree(home: &VfsPath, user: &str, host: &str) -> Node {
    let mut root = Node::dir(
        "",
        [
            Node::dir(
                "etc",
                [
                    Node::file("motd", MOTD),
                    Node::file("hostname", host),
                    Node::file("passwd", format!("{user}:x:1000:1000::{home}:/bin/phosphor")),
                ],
            ),
            Node::dir("var", [Node::dir("log", [Node::file("system.log", SYSLOG)])]),
        ],
    );

    let home_children = [
        Node::dir(
            "docs",
            [
                Node::file("manifesto.txt", MANIFESTO),
                Node::file("mission-log.md", MISSION_LOG),
            ],
        ),
        Node::dir("relay", [Node::file("notes.txt", RELAY_NOTES)]),
        Node::file("readme.txt", README),
    ];

    match (home.parent(), home.file_name()) {
        (Some(parent), Some(name)) => root.graft(&parent, Node::dir(name, home_children)),
        _ => {
            for child in home_children {
                root.graft(&VfsPath::root(), child);
            }
        }
    }
    root
}
