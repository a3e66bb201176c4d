#[allow(dead_code)]
#[macro_use]
mod common;

use common::harness::products;
use shelf::tui::event::Action;

// Navigation aliases

shelf_test!(keys_ctrl_n_ctrl_p, products(), &[], {
    @type "red";
    @ctrl 'n';
    @active Some(0);
    @ctrl 'j';
    @active Some(1);
    @ctrl 'p';
    @active Some(0);
    @ctrl 'k';
    @active None;
});

// Query editing

shelf_test!(keys_backspace, products(), &[], {
    @type "redx";
    @results [];
    @key Backspace;
    @results ["Red Shirt", "Red Hat"];
    @ctrl 'h';
    @ctrl 'h';
    @results ["Red Shirt", "Blue Shirt", "Red Hat"];
});

shelf_test!(keys_ctrl_u_clears_query, products(), &[], {
    @type "red hat";
    @results ["Red Hat"];
    @ctrl 'u';
    @contains "Search products";
    @lacks "Red Hat";
});

shelf_test!(keys_ctrl_w_deletes_word, products(), &[], {
    @type "red hat";
    @ctrl 'w';
    @results ["Red Shirt", "Red Hat"];
    @contains "> red";
});

shelf_test!(keys_shifted_chars, products(), &[], {
    @type "Blue";
    @results ["Blue Shirt"];
    @contains "> Blue";
});

// Quitting

shelf_test!(keys_esc_aborts, products(), &[], {
    @type "red";
    @running;
    @key Esc;
    @exited 130;
});

shelf_test!(keys_ctrl_c_aborts, products(), &[], {
    @ctrl 'c';
    @exited 130;
});

shelf_test!(keys_ctrl_g_aborts, products(), &[], {
    @ctrl 'g';
    @exited 130;
});

// Selection notice

shelf_test!(keys_notice_ignores_input, products(), &[], {
    @type "hat";
    @key Down;
    @key Enter;
    @contains "You selected Red Hat";
    @type "abc";
    @key Down;
    @key Backspace;
    @contains "You selected Red Hat";
    @key Esc;
    @lacks "You selected";
    @contains "Search products";
    @running;
});

shelf_test!(keys_notice_ctrl_c_quits, products(), &[], {
    @type "hat";
    @key Down;
    @key Enter;
    @ctrl 'c';
    @committed ["Red Hat"];
    @exited 0;
});

shelf_test!(keys_once_exits_after_acknowledge, products(), &["--once"], {
    @type "hat";
    @key Down;
    @key Enter;
    @running;
    @char ' ';
    @exited 0;
    @committed ["Red Hat"];
});

// Custom bindings

shelf_test!(keys_custom_bind, products(), &["--bind", "tab:down,btab:up,ctrl-a:down+accept"], {
    @type "red";
    @key Tab;
    @active Some(0);
    @key Tab;
    @active Some(1);
    @key BackTab;
    @active Some(0);
    @key Esc;
    @exited 130;
});

shelf_test!(keys_bound_action_chain, products(), &["--bind", "ctrl-a:down+accept"], {
    @type "shirt";
    @ctrl 'a';
    @committed ["Red Shirt"];
});

shelf_test!(keys_actions_directly, products(), &[], {
    @action Action::AddChar('h');
    @action Action::AddChar('a');
    @action Action::AddChar('t');
    @results ["Red Hat"];
    @action Action::Down;
    @action Action::Accept;
    @committed ["Red Hat"];
});
