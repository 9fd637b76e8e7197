//! Embedded HTML served by the mirror site at `/`

pub const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Nexus Controller Hub - Downloads</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
            background: linear-gradient(135deg, #1e3c72 0%, #2a5298 100%);
            color: white;
            min-height: 100vh;
            margin: 0;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .container {
            max-width: 640px;
            padding: 40px;
            background: rgba(255, 255, 255, 0.1);
            border-radius: 20px;
            text-align: center;
        }
        .download-btn {
            display: inline-block;
            margin: 10px;
            padding: 14px 28px;
            border-radius: 30px;
            background: #4ade80;
            color: #10233f;
            font-weight: 700;
            text-decoration: none;
        }
        ul { text-align: left; display: inline-block; }
    </style>
</head>
<body>
    <div class="container">
        <h1>Nexus Controller Hub</h1>
        <p>Android controller remapping and macro app</p>
        <a class="download-btn" href="/download/latest">Download latest APK</a>
        <a class="download-btn" href="/android/app/build/outputs/apk/debug/app-debug.apk">Debug build</a>
        <ul>
            <li><a href="/CONTROLLER_TESTING_GUIDE.md">Testing guide</a></li>
            <li><a href="/README.md">README</a></li>
            <li><a href="/android/">Source tree</a></li>
        </ul>
    </div>
</body>
</html>
"#;
