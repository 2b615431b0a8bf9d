use keepass::{config::DatabaseConfig, db::Node, db::Value, Database, DatabaseKey};
use std::fs::File;

fn entry(title: &str, username: &str, password: &str, url: &str) -> keepass::db::Entry {
    let mut entry = keepass::db::Entry::new();
    entry.fields.insert("Title".to_string(), Value::Unprotected(title.to_string()));
    entry.fields.insert("UserName".to_string(), Value::Unprotected(username.to_string()));
    entry.fields.insert("Password".to_string(), Value::Unprotected(password.to_string()));
    entry.fields.insert("URL".to_string(), Value::Unprotected(url.to_string()));
    entry
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::new(DatabaseConfig::default());
    db.meta.database_name = Some("Sample DB".to_string());
    db.meta.database_description = Some("A sample database for keestats".to_string());

    db.root
        .children
        .push(Node::Entry(entry("Router", "admin", "", "http://192.168.0.1")));

    // Reused and empty passwords across nested groups
    let mut internet = keepass::db::Group::new("Internet");
    internet.children.push(Node::Entry(entry("Mail", "alice", "hunter2", "https://mail.example.com")));
    internet.children.push(Node::Entry(entry("Forum", "alice", "hunter2", "https://forum.example.com")));
    internet.children.push(Node::Entry(entry("Shop", "alice", "Tr0ub4dor&3", "https://shop.example.com")));

    let mut social = keepass::db::Group::new("Social");
    social.children.push(Node::Entry(entry("Chat", "alice", "correct horse battery staple", "")));
    social.children.push(Node::Entry(entry("Photos", "alice", "", "")));
    internet.children.push(Node::Group(social));
    db.root.children.push(Node::Group(internet));

    let mut work = keepass::db::Group::new("Work");
    work.children.push(Node::Entry(entry("VPN", "a.smith", "pw", "vpn.corp.example")));
    db.root.children.push(Node::Group(work));

    db.root.children.push(Node::Group(keepass::db::Group::new("Empty")));

    // Recycle bin
    let mut bin = keepass::db::Group::new("Recycle Bin");
    bin.icon_id = Some(43); // Trash icon
    let bin_uuid = bin.uuid;
    db.root.children.push(Node::Group(bin));
    db.meta.recyclebin_uuid = Some(bin_uuid);
    db.meta.recyclebin_enabled = Some(true);

    let key = DatabaseKey::new().with_password("password");
    let mut file = File::create("sample_db.kdbx")?;
    db.save(&mut file, key)?;

    println!("Created sample_db.kdbx with password 'password'");
    Ok(())
}
